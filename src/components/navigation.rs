use std::rc::Rc;

use tracing::{info, warn};

use crate::context::AppContext;
use crate::request::HttpClient;
use crate::web::route::AppRoute;
use crate::web::surface::ToastKind;

/// 受保护视图顶部的常驻导航栏
pub struct NavigationBar<C: HttpClient> {
    ctx: Rc<AppContext<C>>,
}

impl<C: HttpClient> NavigationBar<C> {
    pub fn new(ctx: Rc<AppContext<C>>) -> Self {
        Self { ctx }
    }

    pub fn show_dashboard(&self) {
        self.ctx.location.assign_route(AppRoute::Dashboard);
    }

    pub fn show_history(&self) {
        self.ctx.location.assign_route(AppRoute::History);
    }

    /// 注销；失败时会话状态保持不变
    pub async fn logout(&self) {
        let ctx = &self.ctx;
        let result = ctx.api.logout().await;

        if result.ok {
            info!("Logged out.");
            ctx.session.mark_unauthenticated();
            ctx.surface.toast("Logged out successfully", ToastKind::Success);
            ctx.location.assign_route(AppRoute::Login);
        } else {
            warn!(status = result.status, "Logout failed.");
            ctx.surface
                .toast("Logout failed. Please try again.", ToastKind::Error);
        }
    }
}
