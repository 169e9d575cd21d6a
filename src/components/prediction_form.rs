//! 表单状态管理模块
//!
//! `PredictionForm` 负责：
//! - 字段的一次性创建（幂等）
//! - 原始输入的持有（失败后保留，便于重新提交）
//! - 输入到特征向量的转换

use std::cell::RefCell;

use fraudwatch_shared::{FEATURE_NAMES, TransactionFeatures};

use crate::web::surface::Surface;

#[derive(Debug, Clone, PartialEq)]
struct FormField {
    name: &'static str,
    raw: String,
}

#[derive(Debug, Default)]
pub struct PredictionForm {
    fields: RefCell<Vec<FormField>>,
}

impl PredictionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        !self.fields.borrow().is_empty()
    }

    /// 创建全部字段并渲染；已创建时什么也不做
    ///
    /// 返回本次是否真正创建了字段。
    pub fn initialize(&self, surface: &dyn Surface) -> bool {
        if self.is_initialized() {
            return false;
        }
        *self.fields.borrow_mut() = FEATURE_NAMES
            .iter()
            .map(|&name| FormField {
                name,
                raw: String::new(),
            })
            .collect();
        surface.render_fields(&FEATURE_NAMES);
        true
    }

    /// 写入字段原始值；字段不存在时返回 false
    pub fn set_value(&self, name: &str, raw: &str) -> bool {
        let mut fields = self.fields.borrow_mut();
        match fields.iter_mut().find(|f| f.name == name) {
            Some(field) => {
                field.raw = raw.to_string();
                true
            }
            None => false,
        }
    }

    pub fn value(&self, name: &str) -> Option<String> {
        self.fields
            .borrow()
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.raw.clone())
    }

    pub fn field_count(&self) -> usize {
        self.fields.borrow().len()
    }

    /// 将当前输入转换为特征向量，空白与非法输入记为 0
    pub fn to_features(&self) -> TransactionFeatures {
        let fields = self.fields.borrow();
        TransactionFeatures::from_entries(fields.iter().map(|f| (f.name, f.raw.as_str())))
    }
}
