//! 认证模块
//!
//! 管理会话状态，与路由系统解耦。
//! 路由服务通过注入的 `SessionGuard` 句柄检查认证状态，而不是读取全局变量。

use std::cell::Cell;

use tracing::{debug, info};

use crate::api::FraudApi;
use crate::request::HttpClient;

/// 会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// 启动后尚未询问后端
    #[default]
    Unknown,
    Authenticated,
    Unauthenticated,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated)
    }
}

/// 会话守卫
///
/// 进程内唯一的认证状态来源。状态从不持久化，重新加载后总是向后端重新确认。
#[derive(Debug, Default)]
pub struct SessionGuard {
    state: Cell<SessionState>,
    // 乐观登录留下的一次性凭证，供紧随其后的受保护导航使用
    vouched: Cell<bool>,
    // 本地登录/登出的次数；检查期间若有变化，检查结果作废
    marks: Cell<u64>,
}

impl SessionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.get().is_authenticated()
    }

    /// 向 `/check-auth` 确认会话，并以结果覆盖当前状态
    ///
    /// 非 2xx 或传输失败都视为未认证，而不是错误。
    /// 等待期间发生了本地登录或登出时，保留本地状态并返回它。
    pub async fn check_authentication<C: HttpClient>(&self, api: &FraudApi<C>) -> bool {
        let marks = self.marks.get();
        let authenticated = api.check_auth().await.ok;
        if self.marks.get() != marks {
            debug!("[Session] Local login/logout during check-auth, keeping local state.");
            return self.is_authenticated();
        }
        self.vouched.set(false);
        self.set(if authenticated {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        });
        authenticated
    }

    /// 受保护导航使用的校验
    ///
    /// 刚刚乐观登录过则直接放行一次，否则走完整的后端确认。
    pub async fn verify<C: HttpClient>(&self, api: &FraudApi<C>) -> bool {
        if self.vouched.replace(false) && self.is_authenticated() {
            debug!("[Session] Using login vouch, skipping check-auth.");
            return true;
        }
        self.check_authentication(api).await
    }

    /// 登录成功后的乐观更新
    pub fn mark_authenticated(&self) {
        self.marks.set(self.marks.get() + 1);
        self.set(SessionState::Authenticated);
    }

    /// 允许下一次受保护导航跳过 `/check-auth`
    ///
    /// 只应在登录后确实发出跳转时调用。
    pub fn vouch_next_navigation(&self) {
        self.vouched.set(self.is_authenticated());
    }

    /// 登出成功后的乐观更新
    pub fn mark_unauthenticated(&self) {
        self.marks.set(self.marks.get() + 1);
        self.vouched.set(false);
        self.set(SessionState::Unauthenticated);
    }

    fn set(&self, next: SessionState) {
        let prev = self.state.replace(next);
        if prev != next {
            info!(from = ?prev, to = ?next, "[Session] State changed.");
        }
    }
}
