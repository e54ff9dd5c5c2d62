//! 多订阅者事件
//!
//! 每个订阅得到一个 crossbeam 接收端，订阅方在自己的更新中拉取事件，
//! 触发方不需要持有订阅方的引用。接收端被丢弃的订阅会在下次触发时清理。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crossbeam_channel::{unbounded, Receiver, Sender};

/// 订阅标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

/// 事件
#[derive(Debug)]
pub struct Event<A> {
    next_id: AtomicU64,
    subscribers: Mutex<Vec<(ConnectionId, Sender<A>)>>,
}

impl<A> Default for Event<A> {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl<A: Clone> Event<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 订阅事件
    pub fn connect(&self) -> (ConnectionId, Receiver<A>) {
        let id = ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (sender, receiver) = unbounded();
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push((id, sender));
        }
        (id, receiver)
    }

    /// 取消订阅，订阅不存在时返回 `false`
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        let Ok(mut subscribers) = self.subscribers.lock() else {
            return false;
        };
        let before = subscribers.len();
        subscribers.retain(|(connection, _)| *connection != id);
        subscribers.len() != before
    }

    /// 触发事件，返回收到事件的订阅数量
    pub fn emit(&self, args: A) -> usize {
        let Ok(mut subscribers) = self.subscribers.lock() else {
            return 0;
        };
        subscribers.retain(|(_, sender)| sender.send(args.clone()).is_ok());
        subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|s| s.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_reaches_all_subscribers() {
        let event = Event::<u32>::new();
        let (_, a) = event.connect();
        let (_, b) = event.connect();

        assert_eq!(event.emit(7), 2);
        assert_eq!(a.try_recv(), Ok(7));
        assert_eq!(b.try_recv(), Ok(7));
    }

    #[test]
    fn test_disconnect() {
        let event = Event::<()>::new();
        let (id, receiver) = event.connect();

        assert!(event.disconnect(id));
        assert!(!event.disconnect(id));
        assert_eq!(event.emit(()), 0);
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_dropped_receiver_is_pruned() {
        let event = Event::<bool>::new();
        let (_, receiver) = event.connect();
        let (_, _kept) = event.connect();
        drop(receiver);

        assert_eq!(event.emit(true), 1);
        assert_eq!(event.subscriber_count(), 1);
    }
}
