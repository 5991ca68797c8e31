use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::NotificationExpired;

/// Deferred clear for one notification.
///
/// Runs as a tokio task that sleeps for the delay and then posts
/// `NotificationExpired(id)`. Cancelling or dropping the timer aborts the
/// task, so nothing is sent after that point.
#[derive(Debug)]
pub struct ClearTimer {
    id: u64,
    handle: JoinHandle<()>,
}

impl ClearTimer {
    pub fn start<E>(id: u64, delay: Duration, tx: mpsc::Sender<E>) -> Self
    where
        E: From<NotificationExpired> + Send + 'static,
    {
        // Deadline is fixed here, not at the task's first poll
        let sleep = tokio::time::sleep(delay);
        let handle = tokio::spawn(async move {
            sleep.await;
            let _ = tx.send(E::from(NotificationExpired(id))).await;
        });
        Self { id, handle }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn cancel(self) {
        self.handle.abort();
    }
}

impl Drop for ClearTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_timer_posts_its_id() {
        let (tx, mut rx) = mpsc::channel::<NotificationExpired>(1);
        let timer = ClearTimer::start(42, Duration::from_millis(2000), tx);
        assert_eq!(timer.id(), 42);

        assert_eq!(rx.recv().await, Some(NotificationExpired(42)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_timer_sends_nothing() {
        let (tx, mut rx) = mpsc::channel::<NotificationExpired>(1);
        drop(ClearTimer::start(1, Duration::from_millis(10), tx));

        // Sender went away with the aborted task
        assert_eq!(rx.recv().await, None);
    }
}
