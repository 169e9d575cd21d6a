//! Location 封装模块
//!
//! 持有当前 URL fragment，并在 fragment 被改写时排队一条“位置变化”事件，
//! 相当于浏览器的 `hashchange`。事件由 `App::dispatch` 统一消费。

use std::cell::RefCell;
use std::collections::VecDeque;

use tracing::debug;

use super::route::AppRoute;

#[derive(Debug, Default)]
pub struct Location {
    fragment: RefCell<String>,
    pending: RefCell<VecDeque<String>>,
}

impl Location {
    /// 以初始 fragment 创建，并排队一次初始加载事件
    pub fn new(initial: &str) -> Self {
        let location = Self::default();
        *location.fragment.borrow_mut() = initial.to_string();
        location.reload();
        location
    }

    /// 获取当前 fragment
    pub fn fragment(&self) -> String {
        self.fragment.borrow().clone()
    }

    /// 改写 fragment；与当前值相同时不产生事件
    ///
    /// 返回是否产生了事件。
    pub fn assign(&self, fragment: &str) -> bool {
        let changed = {
            let mut current = self.fragment.borrow_mut();
            if *current == fragment {
                false
            } else {
                *current = fragment.to_string();
                true
            }
        };
        if changed {
            debug!(fragment, "[Location] Fragment changed.");
            self.pending.borrow_mut().push_back(fragment.to_string());
        }
        changed
    }

    pub fn assign_route(&self, route: AppRoute) -> bool {
        self.assign(route.fragment())
    }

    /// 对当前 fragment 重新产生一次事件（页面加载）
    pub fn reload(&self) {
        let current = self.fragment();
        self.pending.borrow_mut().push_back(current);
    }

    /// 取出下一条待处理的事件
    pub fn take_change(&self) -> Option<String> {
        self.pending.borrow_mut().pop_front()
    }
}
