//! 订单状态机
//!
//! 推进表是唯一事实来源，禁止跳级：
//!
//! | 当前 | 允许的下一步 |
//! |------|------|
//! | pending | received, cancelled |
//! | received | preparing, cancelled |
//! | preparing | ready |
//! | ready | served |
//! | served | completed |
//!
//! completed / cancelled 为终态，表外的任何组合（含原地转移）都被拒绝。

use crate::db::models::OrderStatus;

/// 全部状态，穷举检查用
pub const ALL_STATUSES: [OrderStatus; 7] = [
    OrderStatus::Pending,
    OrderStatus::Received,
    OrderStatus::Preparing,
    OrderStatus::Ready,
    OrderStatus::Served,
    OrderStatus::Completed,
    OrderStatus::Cancelled,
];

impl OrderStatus {
    /// Allowed next statuses from this one
    pub fn allowed_next(&self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[OrderStatus::Received, OrderStatus::Cancelled],
            OrderStatus::Received => &[OrderStatus::Preparing, OrderStatus::Cancelled],
            OrderStatus::Preparing => &[OrderStatus::Ready],
            OrderStatus::Ready => &[OrderStatus::Served],
            OrderStatus::Served => &[OrderStatus::Completed],
            OrderStatus::Completed | OrderStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        self.allowed_next().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// 取消只在进入厨房前合法
    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Received)
    }

    /// Wire name, matches the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Received => "received",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Served => "served",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn transition_table_is_exhaustive() {
        let allowed = [
            (Pending, Received),
            (Pending, Cancelled),
            (Received, Preparing),
            (Received, Cancelled),
            (Preparing, Ready),
            (Ready, Served),
            (Served, Completed),
        ];

        for from in ALL_STATUSES {
            for to in ALL_STATUSES {
                let expected = allowed.contains(&(from, to));
                assert_eq!(
                    from.can_transition_to(to),
                    expected,
                    "{:?} -> {:?}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn same_state_transitions_are_rejected() {
        for status in ALL_STATUSES {
            assert!(!status.can_transition_to(status), "{:?}", status);
        }
    }

    #[test]
    fn terminal_states_have_no_exits() {
        assert!(Completed.is_terminal());
        assert!(Cancelled.is_terminal());
        assert!(Completed.allowed_next().is_empty());
        assert!(Cancelled.allowed_next().is_empty());

        for status in [Pending, Received, Preparing, Ready, Served] {
            assert!(!status.is_terminal(), "{:?}", status);
        }
    }

    #[test]
    fn cancel_window_closes_at_the_kitchen() {
        assert!(Pending.can_cancel());
        assert!(Received.can_cancel());

        for status in [Preparing, Ready, Served, Completed, Cancelled] {
            assert!(!status.can_cancel(), "{:?}", status);
        }
    }

    #[test]
    fn skipping_a_step_is_rejected() {
        assert!(!Pending.can_transition_to(Preparing));
        assert!(!Received.can_transition_to(Ready));
        assert!(!Preparing.can_transition_to(Served));
        assert!(!Ready.can_transition_to(Completed));
    }
}
