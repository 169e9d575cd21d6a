use std::cell::Cell;

/// 单调递增的代数计数器
///
/// 每次导航或提交领取一张 `Ticket`，异步调用返回时若票据已不是最新，
/// 结果即为过期，应当丢弃。
#[derive(Debug, Default)]
pub struct Generation(Cell<u64>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> Ticket {
        let next = self.0.get() + 1;
        self.0.set(next);
        Ticket(next)
    }

    pub fn current(&self) -> Ticket {
        Ticket(self.0.get())
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.0.get() == ticket.0
    }
}
