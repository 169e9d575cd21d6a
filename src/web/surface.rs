//! 显示层抽象
//!
//! 控制器只通过 `Surface` 操作界面，不直接查找任何显示节点，
//! 因此无需真实文档即可测试。`MemorySurface` 把界面状态保存在内存中。

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use fraudwatch_shared::date::format_local;
use fraudwatch_shared::{HistoryRecord, PredictionResult, Verdict};

use super::route::AppRoute;

/// 带提交按钮的表单
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormId {
    Login,
    Register,
    Predict,
}

/// 行内错误的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorSlot {
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    AlertCircle,
    CheckCircle,
}

impl Icon {
    pub fn for_verdict(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Fraud => Icon::AlertCircle,
            Verdict::Legitimate => Icon::CheckCircle,
        }
    }
}

/// 预测结果弹窗
#[derive(Debug, Clone, PartialEq)]
pub struct ResultCard {
    pub verdict: Verdict,
    /// 后端给出的标签，原样展示
    pub message: String,
}

impl ResultCard {
    pub fn from_prediction(result: &PredictionResult) -> Self {
        Self {
            verdict: Verdict::from_flag(result.is_fraud),
            message: result.prediction_label.clone(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self.verdict {
            Verdict::Fraud => "Fraud Alert",
            Verdict::Legitimate => "Legitimate Transaction",
        }
    }

    pub fn style(&self) -> &'static str {
        match self.verdict {
            Verdict::Fraud => "fraud-alert",
            Verdict::Legitimate => "legitimate-alert",
        }
    }

    pub fn icon(&self) -> Icon {
        Icon::for_verdict(self.verdict)
    }
}

/// 历史表格中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub timestamp: String,
    pub result: String,
    pub verdict: Verdict,
}

impl From<&HistoryRecord> for HistoryRow {
    fn from(record: &HistoryRecord) -> Self {
        Self {
            timestamp: format_local(&record.timestamp),
            result: record.prediction_result.clone(),
            verdict: Verdict::from_flag(record.is_fraud),
        }
    }
}

/// 历史视图的三种互斥状态
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryView {
    Loading,
    Empty,
    Table(Vec<HistoryRow>),
}

/// 显示层接口
pub trait Surface {
    /// 隐藏其他所有视图，只显示 `route`
    fn show_page(&self, route: AppRoute);
    fn set_navigation_visible(&self, visible: bool);
    fn set_submit_enabled(&self, form: FormId, enabled: bool);
    fn show_error(&self, slot: ErrorSlot, message: &str);
    fn hide_error(&self, slot: ErrorSlot);
    fn toast(&self, message: &str, kind: ToastKind);
    fn render_fields(&self, fields: &[&str]);
    fn show_result(&self, card: &ResultCard);
    fn close_result(&self);
    fn render_history(&self, view: &HistoryView);
}

// =========================================================
// 内存实现
// =========================================================

/// `MemorySurface` 记录的界面状态
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenState {
    pub page: Option<AppRoute>,
    /// 按顺序记录每次显示过的视图
    pub page_log: Vec<AppRoute>,
    pub navigation_visible: bool,
    pub disabled: HashSet<FormId>,
    pub errors: HashMap<ErrorSlot, String>,
    pub toasts: Vec<(String, ToastKind)>,
    pub fields: Vec<String>,
    pub field_renders: usize,
    pub result: Option<ResultCard>,
    pub history: Option<HistoryView>,
    pub history_log: Vec<HistoryView>,
}

#[derive(Debug, Default)]
pub struct MemorySurface {
    state: RefCell<ScreenState>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ScreenState {
        self.state.borrow().clone()
    }
}

impl Surface for MemorySurface {
    fn show_page(&self, route: AppRoute) {
        let mut state = self.state.borrow_mut();
        state.page = Some(route);
        state.page_log.push(route);
    }

    fn set_navigation_visible(&self, visible: bool) {
        self.state.borrow_mut().navigation_visible = visible;
    }

    fn set_submit_enabled(&self, form: FormId, enabled: bool) {
        let mut state = self.state.borrow_mut();
        if enabled {
            state.disabled.remove(&form);
        } else {
            state.disabled.insert(form);
        }
    }

    fn show_error(&self, slot: ErrorSlot, message: &str) {
        self.state
            .borrow_mut()
            .errors
            .insert(slot, message.to_string());
    }

    fn hide_error(&self, slot: ErrorSlot) {
        self.state.borrow_mut().errors.remove(&slot);
    }

    fn toast(&self, message: &str, kind: ToastKind) {
        self.state
            .borrow_mut()
            .toasts
            .push((message.to_string(), kind));
    }

    fn render_fields(&self, fields: &[&str]) {
        let mut state = self.state.borrow_mut();
        state.fields.extend(fields.iter().map(|f| f.to_string()));
        state.field_renders += 1;
    }

    fn show_result(&self, card: &ResultCard) {
        self.state.borrow_mut().result = Some(card.clone());
    }

    fn close_result(&self) {
        self.state.borrow_mut().result = None;
    }

    fn render_history(&self, view: &HistoryView) {
        let mut state = self.state.borrow_mut();
        state.history = Some(view.clone());
        state.history_log.push(view.clone());
    }
}
