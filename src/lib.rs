//! FraudWatch 客户端核心
//!
//! 采用显式注入的高内聚低耦合架构：
//! - `web::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `web::location`: URL fragment 与位置变化事件
//! - `session`: 认证状态管理
//! - `components`: 各视图的控制器
//!
//! 整个客户端运行在单线程上，并发只体现为交错的异步续延。

mod context;
mod error;
mod session;

pub mod api;
pub mod config;
pub mod request;

pub mod components {
    pub mod dashboard;
    pub mod history;
    pub mod login;
    pub mod navigation;
    pub mod prediction_form;
    pub mod register;
}

pub mod web {
    pub mod generation;
    pub mod location;
    pub mod route;
    pub mod router;
    pub mod surface;
}

#[cfg(test)]
mod tests;

use std::rc::Rc;

use fraudwatch_shared::Credentials;
use tracing::debug;

pub use api::{ApiResult, FraudApi};
pub use config::ClientConfig;
pub use context::AppContext;
pub use error::{ConfigError, TransportError};
pub use request::{HttpClient, ReqwestHttpClient};
pub use session::{SessionGuard, SessionState};

use components::dashboard::DashboardPage;
use components::history::HistoryPage;
use components::login::LoginPage;
use components::navigation::NavigationBar;
use components::register::RegisterPage;
use web::route::AppRoute;
use web::router::{Resolution, Router};
use web::surface::Surface;

/// 应用根
///
/// 构造全部组件，并把位置变化事件分发给路由器；路由切换完成后
/// 再触发对应视图的初始化。
pub struct App<C: HttpClient> {
    ctx: Rc<AppContext<C>>,
    router: Router<C>,
    login: LoginPage<C>,
    register: RegisterPage<C>,
    navigation: NavigationBar<C>,
    dashboard: DashboardPage<C>,
    history: HistoryPage<C>,
}

impl<C: HttpClient> App<C> {
    /// 创建应用；`initial_fragment` 相当于页面加载时的 URL fragment
    pub fn new(
        client: C,
        config: ClientConfig,
        surface: Rc<dyn Surface>,
        initial_fragment: &str,
    ) -> Self {
        let api = FraudApi::new(client, config);
        let ctx = Rc::new(AppContext::new(api, surface, initial_fragment));

        Self {
            router: Router::new(ctx.clone()),
            login: LoginPage::new(ctx.clone()),
            register: RegisterPage::new(ctx.clone()),
            navigation: NavigationBar::new(ctx.clone()),
            dashboard: DashboardPage::new(ctx.clone()),
            history: HistoryPage::new(ctx.clone()),
            ctx,
        }
    }

    pub fn current_view(&self) -> Option<AppRoute> {
        self.router.current_view()
    }

    pub fn session_state(&self) -> SessionState {
        self.ctx.session.state()
    }

    pub fn fragment(&self) -> String {
        self.ctx.location.fragment()
    }

    /// 处理所有待处理的位置变化事件
    pub async fn dispatch(&self) {
        while let Some(fragment) = self.ctx.location.take_change() {
            self.handle_location_change(&fragment).await;
        }
    }

    async fn handle_location_change(&self, fragment: &str) {
        match self.router.resolve(fragment).await {
            Resolution::Shown(AppRoute::Dashboard) => self.dashboard.enter(),
            Resolution::Shown(AppRoute::History) => self.history.load().await,
            Resolution::Shown(_) => {}
            Resolution::Redirected | Resolution::Stale => {
                debug!(fragment, "Location change did not commit a view.");
            }
        }
    }

    /// 用户直接改写 fragment（地址栏、链接）
    pub async fn goto(&self, fragment: &str) {
        self.ctx.location.assign(fragment);
        self.dispatch().await;
    }

    pub async fn navigate(&self, route: AppRoute) {
        self.router.navigate(route);
        self.dispatch().await;
    }

    /// 对当前 fragment 重新产生一次加载事件
    pub async fn reload(&self) {
        self.ctx.location.reload();
        self.dispatch().await;
    }

    pub async fn submit_login(&self, credentials: Credentials) {
        self.login.submit(credentials).await;
        self.dispatch().await;
    }

    pub async fn submit_register(&self, credentials: Credentials) {
        self.register.submit(credentials).await;
        self.dispatch().await;
    }

    pub async fn logout(&self) {
        self.navigation.logout().await;
        self.dispatch().await;
    }

    pub async fn show_history(&self) {
        self.navigation.show_history();
        self.dispatch().await;
    }

    pub async fn show_dashboard(&self) {
        self.navigation.show_dashboard();
        self.dispatch().await;
    }

    /// 写入预测表单字段；字段尚未创建或名称未知时返回 false
    pub fn set_field(&self, name: &str, raw: &str) -> bool {
        self.dashboard.form().set_value(name, raw)
    }

    pub async fn submit_prediction(&self) {
        self.dashboard.submit().await;
    }

    pub fn close_result(&self) {
        self.dashboard.close_result();
    }
}
