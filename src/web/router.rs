//! 路由服务模块 - 核心引擎
//!
//! 实现了“监听 -> 验证 -> 处理 -> 加载”的导航流程：
//! 每条位置变化事件都会重新进入 [`Router::resolve`]。

use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, info};

use super::route::{AppRoute, RouteRequest};
use crate::context::AppContext;
use crate::request::HttpClient;

/// 一次解析的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// 视图已切换
    Shown(AppRoute),
    /// 已改写 fragment 到登录页，等待下一次事件
    Redirected,
    /// 认证检查返回时已有更新的导航，结果被丢弃
    Stale,
}

/// 路由器服务
///
/// 通过注入的上下文访问会话守卫与显示层，自身只记录当前视图。
pub struct Router<C: HttpClient> {
    ctx: Rc<AppContext<C>>,
    current: Cell<Option<AppRoute>>,
}

impl<C: HttpClient> Router<C> {
    pub fn new(ctx: Rc<AppContext<C>>) -> Self {
        Self {
            ctx,
            current: Cell::new(None),
        }
    }

    /// 当前可见的视图；首个事件处理前为 None
    pub fn current_view(&self) -> Option<AppRoute> {
        self.current.get()
    }

    /// 请求导航：改写 fragment，由事件循环完成实际切换
    pub fn navigate(&self, route: AppRoute) {
        self.ctx.location.assign_route(route);
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载
    pub async fn resolve(&self, fragment: &str) -> Resolution {
        let ticket = self.ctx.navigation.next();
        let request = RouteRequest::parse(fragment);

        // --- Step 1: 公开路由直接进入 ---
        if let Some(route) = request.public_route() {
            self.commit(route);
            return Resolution::Shown(route);
        }

        // --- Step 2: 受保护或未识别的路由，挂起等待认证 ---
        let authenticated = self.ctx.session.verify(&self.ctx.api).await;

        if !self.ctx.navigation.is_current(ticket) {
            debug!(fragment, "[Router] Navigation superseded, dropping auth result.");
            return Resolution::Stale;
        }

        match (authenticated, request) {
            (true, RouteRequest::Known(route)) => {
                self.commit(route);
                Resolution::Shown(route)
            }
            (false, _) => {
                info!(fragment, "[Router] Access Denied. Redirecting to Login.");
                self.ctx
                    .location
                    .assign_route(AppRoute::auth_failure_redirect());
                Resolution::Redirected
            }
            (true, RouteRequest::Unrecognized(name)) => {
                info!(route = %name, "[Router] Unknown route. Redirecting to Login.");
                self.ctx
                    .location
                    .assign_route(AppRoute::auth_failure_redirect());
                Resolution::Redirected
            }
        }
    }

    /// 加载页面 (更新显示状态)
    fn commit(&self, route: AppRoute) {
        let surface = &self.ctx.surface;
        surface.set_navigation_visible(route.requires_auth());
        surface.show_page(route);
        self.current.set(Some(route));
        debug!(route = %route, "[Router] View shown.");
    }
}
