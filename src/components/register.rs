use std::rc::Rc;

use fraudwatch_shared::Credentials;
use tracing::{debug, info};

use crate::context::AppContext;
use crate::request::HttpClient;
use crate::web::route::AppRoute;
use crate::web::surface::{ErrorSlot, FormId, ToastKind};

const REGISTER_CREATED: u16 = 201;
const REGISTER_FAILED: &str = "Registration failed";
const REGISTER_SUCCEEDED: &str = "Registration successful! Redirecting to login...";

pub struct RegisterPage<C: HttpClient> {
    ctx: Rc<AppContext<C>>,
}

impl<C: HttpClient> RegisterPage<C> {
    pub fn new(ctx: Rc<AppContext<C>>) -> Self {
        Self { ctx }
    }

    /// 提交注册表单
    ///
    /// 只有状态码恰好为 201 才算成功；成功后延迟一段时间再跳转登录页，
    /// 提交之后若用户已导航到别处则不再跳转。
    pub async fn submit(&self, credentials: Credentials) {
        let ctx = &self.ctx;
        ctx.surface.hide_error(ErrorSlot::Register);
        ctx.surface.set_submit_enabled(FormId::Register, false);

        let ticket = ctx.navigation.current();
        let result = ctx.api.register(&credentials).await;

        if result.status != REGISTER_CREATED {
            let message = result.error_message().unwrap_or(REGISTER_FAILED);
            ctx.surface.show_error(ErrorSlot::Register, message);
            ctx.surface.set_submit_enabled(FormId::Register, true);
            return;
        }

        info!(user = %credentials.username, "Registration succeeded.");
        ctx.surface.toast(REGISTER_SUCCEEDED, ToastKind::Success);
        ctx.surface.set_submit_enabled(FormId::Register, true);

        tokio::time::sleep(ctx.api.config().register_redirect_delay).await;

        if ctx.navigation.is_current(ticket) {
            ctx.location.assign_route(AppRoute::Login);
        } else {
            debug!("User navigated away before the register redirect fired.");
        }
    }
}
