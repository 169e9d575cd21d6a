use std::rc::Rc;

use fraudwatch_shared::TransactionFeatures;
use tracing::{debug, warn};

use super::prediction_form::PredictionForm;
use crate::context::AppContext;
use crate::request::HttpClient;
use crate::web::generation::Generation;
use crate::web::surface::{FormId, ResultCard, ToastKind};

const PREDICTION_FAILED: &str = "Prediction failed. Please try again.";

pub struct DashboardPage<C: HttpClient> {
    ctx: Rc<AppContext<C>>,
    form: PredictionForm,
    submissions: Generation,
}

impl<C: HttpClient> DashboardPage<C> {
    pub fn new(ctx: Rc<AppContext<C>>) -> Self {
        Self {
            ctx,
            form: PredictionForm::new(),
            submissions: Generation::new(),
        }
    }

    pub fn form(&self) -> &PredictionForm {
        &self.form
    }

    /// 进入面板时调用，可重复调用
    pub fn enter(&self) {
        if self.form.initialize(self.ctx.surface.as_ref()) {
            debug!("Prediction form initialized.");
        }
    }

    /// 提交预测
    ///
    /// 提交按钮在响应返回后无条件恢复；失败时保留表单内容。
    /// 若期间有更新的提交或导航，本次结果被丢弃。
    pub async fn submit(&self) {
        let ctx = &self.ctx;
        ctx.surface.set_submit_enabled(FormId::Predict, false);

        let features = self.form.to_features();
        let nav_ticket = ctx.navigation.current();
        let ticket = self.submissions.next();

        let result = ctx.api.predict(&features).await;

        ctx.surface.set_submit_enabled(FormId::Predict, true);

        if !self.submissions.is_current(ticket) || !ctx.navigation.is_current(nav_ticket) {
            debug!(status = result.status, "Discarding superseded prediction.");
            return;
        }

        match result.response::<TransactionFeatures>().filter(|_| result.ok) {
            Some(prediction) => {
                ctx.surface
                    .show_result(&ResultCard::from_prediction(&prediction));
            }
            None => {
                warn!(status = result.status, "Prediction request failed.");
                ctx.surface.toast(PREDICTION_FAILED, ToastKind::Error);
            }
        }
    }

    pub fn close_result(&self) {
        self.ctx.surface.close_result();
    }
}
