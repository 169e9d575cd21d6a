//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于任何显示层。
//! 定义了应用的所有视图及其属性。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    /// 注册页面
    Register,
    /// 预测面板 (需要认证)
    Dashboard,
    /// 历史记录 (需要认证)
    History,
}

impl AppRoute {
    pub const ALL: [AppRoute; 4] = [
        AppRoute::Login,
        AppRoute::Register,
        AppRoute::Dashboard,
        AppRoute::History,
    ];

    /// 将视图名解析为路由枚举，空名称视为登录页
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "" | "login" => Some(Self::Login),
            "register" => Some(Self::Register),
            "dashboard" => Some(Self::Dashboard),
            "history" => Some(Self::History),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
            Self::Dashboard => "dashboard",
            Self::History => "history",
        }
    }

    /// 获取路由对应的 URL fragment
    pub fn fragment(&self) -> &'static str {
        match self {
            Self::Login => "#login",
            Self::Register => "#register",
            Self::Dashboard => "#dashboard",
            Self::History => "#history",
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Dashboard | Self::History)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取登录成功后的跳转目标
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.fragment())
    }
}

/// 一次导航请求的目标
///
/// 未识别的名称不会被立即重定向，而是与受保护路由一样先走认证检查。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteRequest {
    Known(AppRoute),
    Unrecognized(String),
}

impl RouteRequest {
    /// 去掉开头的一个 `#`，其余原样作为视图名
    pub fn parse(fragment: &str) -> Self {
        let name = fragment.strip_prefix('#').unwrap_or(fragment);
        match AppRoute::from_name(name) {
            Some(route) => Self::Known(route),
            None => Self::Unrecognized(name.to_string()),
        }
    }

    /// 无需认证即可直接进入的请求
    pub fn public_route(&self) -> Option<AppRoute> {
        match self {
            Self::Known(route) if !route.requires_auth() => Some(*route),
            _ => None,
        }
    }
}
