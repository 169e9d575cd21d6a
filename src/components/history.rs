use std::rc::Rc;

use fraudwatch_shared::HistoryRecord;
use fraudwatch_shared::protocol::HistoryRequest;
use tracing::debug;

use crate::context::AppContext;
use crate::request::HttpClient;
use crate::web::generation::Generation;
use crate::web::surface::{HistoryRow, HistoryView};

pub struct HistoryPage<C: HttpClient> {
    ctx: Rc<AppContext<C>>,
    loads: Generation,
}

impl<C: HttpClient> HistoryPage<C> {
    pub fn new(ctx: Rc<AppContext<C>>) -> Self {
        Self {
            ctx,
            loads: Generation::new(),
        }
    }

    /// 每次进入都重新拉取，不做缓存
    pub async fn load(&self) {
        let ctx = &self.ctx;
        let nav_ticket = ctx.navigation.current();
        let ticket = self.loads.next();

        ctx.surface.render_history(&HistoryView::Loading);
        let result = ctx.api.get_history().await;

        if !self.loads.is_current(ticket) || !ctx.navigation.is_current(nav_ticket) {
            debug!("Discarding superseded history response.");
            return;
        }

        let view = Self::view_for(result.ok, result.response::<HistoryRequest>());
        ctx.surface.render_history(&view);
    }

    /// 失败与零记录对用户不作区分
    fn view_for(ok: bool, records: Option<Vec<HistoryRecord>>) -> HistoryView {
        match records {
            Some(records) if ok && !records.is_empty() => {
                HistoryView::Table(records.iter().map(HistoryRow::from).collect())
            }
            _ => HistoryView::Empty,
        }
    }
}
