use std::rc::Rc;

use fraudwatch_shared::Credentials;
use tracing::{debug, info};

use crate::context::AppContext;
use crate::request::HttpClient;
use crate::web::route::AppRoute;
use crate::web::surface::{ErrorSlot, FormId};

const LOGIN_FAILED: &str = "Invalid username or password";

pub struct LoginPage<C: HttpClient> {
    ctx: Rc<AppContext<C>>,
}

impl<C: HttpClient> LoginPage<C> {
    pub fn new(ctx: Rc<AppContext<C>>) -> Self {
        Self { ctx }
    }

    /// 提交登录表单
    ///
    /// 成功时乐观地标记会话并跳转面板；失败时显示行内错误，会话状态不变。
    /// 只有真正发出跳转时才免去下一次 `/check-auth`。
    pub async fn submit(&self, credentials: Credentials) {
        let ctx = &self.ctx;
        ctx.surface.hide_error(ErrorSlot::Login);
        ctx.surface.set_submit_enabled(FormId::Login, false);

        let ticket = ctx.navigation.current();
        let result = ctx.api.login(&credentials).await;

        if result.ok {
            info!(user = %credentials.username, "Login succeeded.");
            ctx.session.mark_authenticated();
            if !ctx.navigation.is_current(ticket) {
                debug!("User navigated away during login, staying put.");
            } else if ctx.location.assign_route(AppRoute::auth_success_redirect()) {
                ctx.session.vouch_next_navigation();
            } else {
                debug!("Already heading to the dashboard, pending navigation will finish it.");
            }
        } else {
            let message = result.error_message().unwrap_or(LOGIN_FAILED);
            ctx.surface.show_error(ErrorSlot::Login, message);
        }

        ctx.surface.set_submit_enabled(FormId::Login, true);
    }
}
