//! Multi-producer/multi-consumer work queue.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;

use vcrawl_models::WorkItem;

/// Result of a bounded `pop`.
#[derive(Debug)]
pub enum PopResult {
    Item(WorkItem),
    TimedOut,
}

/// An unbounded MPMC-ish queue of [`WorkItem`]s. Built on a
/// `tokio::sync::mpsc::unbounded_channel`: producers and consumers are the
/// same async workers, so there is no separate "closing" signal here — the
/// engine coordinates shutdown through its own stop flag instead.
///
/// Ordering is not FIFO-guaranteed across concurrent producers/consumers;
/// the channel only promises each pushed item is delivered to at most one
/// receiver.
pub struct Frontier {
    tx: mpsc::UnboundedSender<WorkItem>,
    rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<WorkItem>>,
    pending: AtomicUsize,
}

impl Frontier {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: tokio::sync::Mutex::new(rx),
            pending: AtomicUsize::new(0),
        }
    }

    /// Non-blocking push. Fails only if every receiver has been dropped,
    /// which cannot happen while the engine is running (the `Frontier`
    /// itself owns the receiving half).
    pub fn push(&self, item: WorkItem) {
        if self.tx.send(item).is_ok() {
            self.pending.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Block up to `timeout` for an item to become available.
    pub async fn pop(&self, timeout: Duration) -> PopResult {
        let mut rx = self.rx.lock().await;
        match tokio::time::timeout(timeout, rx.recv()).await {
            Ok(Some(item)) => {
                self.pending.fetch_sub(1, Ordering::Relaxed);
                PopResult::Item(item)
            }
            Ok(None) => PopResult::TimedOut,
            Err(_elapsed) => PopResult::TimedOut,
        }
    }

    /// Best-effort count of items pushed but not yet popped. Used only to
    /// decide whether `CrawlEngine::run` has anything to do at startup —
    /// not a linearizable size, since concurrent pops can race it.
    pub fn is_empty(&self) -> bool {
        self.pending.load(Ordering::Relaxed) == 0
    }
}

impl Default for Frontier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pop_returns_pushed_item() {
        let frontier = Frontier::new();
        frontier.push(WorkItem::seed("A".to_string()));
        match frontier.pop(Duration::from_secs(1)).await {
            PopResult::Item(item) => assert_eq!(item.id, "A"),
            PopResult::TimedOut => panic!("expected an item"),
        }
    }

    #[tokio::test]
    async fn pop_times_out_on_empty_queue() {
        let frontier = Frontier::new();
        match frontier.pop(Duration::from_millis(20)).await {
            PopResult::TimedOut => {}
            PopResult::Item(_) => panic!("expected a timeout"),
        }
    }

    #[tokio::test]
    async fn each_item_delivered_to_exactly_one_consumer() {
        use std::sync::Arc;

        let frontier = Arc::new(Frontier::new());
        for i in 0..50 {
            frontier.push(WorkItem::seed(format!("item-{i}")));
        }

        let mut handles = Vec::new();
        for _ in 0..5 {
            let frontier = Arc::clone(&frontier);
            handles.push(tokio::spawn(async move {
                let mut count = 0;
                while let PopResult::Item(_) = frontier.pop(Duration::from_millis(50)).await {
                    count += 1;
                }
                count
            }));
        }

        let mut total = 0;
        for handle in handles {
            total += handle.await.unwrap();
        }
        assert_eq!(total, 50);
    }
}
