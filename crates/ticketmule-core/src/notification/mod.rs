//! Transient user-facing notifications.
//!
//! At most one notification is visible at a time. Showing one starts a
//! `ClearTimer`; when it fires, a `NotificationExpired` message goes out on
//! the owner's channel and the owner hands it back to `expire`. Every
//! notification carries an id so a late expiry can never clear a newer one.

pub mod timer;

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::debug;

pub use timer::ClearTimer;

/// How long a notification stays up
pub const DEFAULT_CLEAR_DELAY_MS: u64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub text: String,
    pub expires_at: DateTime<Utc>,
}

/// Sent by a `ClearTimer` when its notification's time is up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationExpired(pub u64);

/// Owner of the single visible notification.
///
/// Generic over the channel's message type so the timer can post straight
/// into an application's event channel.
pub struct NotificationCenter<E> {
    current: Option<Notification>,
    timer: Option<ClearTimer>,
    next_id: u64,
    delay: Duration,
    tx: mpsc::Sender<E>,
}

impl<E> NotificationCenter<E>
where
    E: From<NotificationExpired> + Send + 'static,
{
    pub fn new(tx: mpsc::Sender<E>, delay: Duration) -> Self {
        Self {
            current: None,
            timer: None,
            next_id: 1,
            delay,
            tx,
        }
    }

    pub fn with_default_delay(tx: mpsc::Sender<E>) -> Self {
        Self::new(tx, Duration::from_millis(DEFAULT_CLEAR_DELAY_MS))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Show a notification unless one is already up.
    /// Must be called from within a tokio runtime.
    pub fn show_if_idle(&mut self, kind: NotificationKind, text: impl Into<String>) -> bool {
        if self.current.is_some() {
            debug!("Notification already visible, new one dropped");
            return false;
        }

        let id = self.next_id;
        self.next_id += 1;

        let text = text.into();
        let delay_ms = i64::try_from(self.delay.as_millis()).unwrap_or(i64::MAX);
        let expires_at = Utc::now() + chrono::Duration::milliseconds(delay_ms);
        debug!(id, ?kind, text = %text, "Showing notification");

        self.timer = Some(ClearTimer::start(id, self.delay, self.tx.clone()));
        self.current = Some(Notification {
            id,
            kind,
            text,
            expires_at,
        });
        true
    }

    /// Handle a timer firing. Returns true if the visible notification
    /// was cleared; expiries for anything else are ignored.
    pub fn expire(&mut self, id: u64) -> bool {
        match self.current {
            Some(ref n) if n.id == id => {
                debug!(id, "Notification expired");
                self.current = None;
                self.timer = None;
                true
            }
            _ => {
                debug!(id, "Stale notification expiry ignored");
                false
            }
        }
    }

    /// Clear the visible notification now and stop its timer
    pub fn dismiss(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        self.current = None;
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    fn center() -> (NotificationCenter<NotificationExpired>, mpsc::Receiver<NotificationExpired>) {
        let (tx, rx) = mpsc::channel(8);
        (NotificationCenter::with_default_delay(tx), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_clears_after_delay_and_not_before() {
        let (mut center, mut rx) = center();
        assert!(center.show_if_idle(NotificationKind::Error, "Incorrect login details"));
        let id = center.current().unwrap().id;

        tokio::time::advance(Duration::from_millis(1999)).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
        assert!(center.is_active());

        tokio::time::advance(Duration::from_millis(1)).await;
        let expired = rx.recv().await.unwrap();
        assert_eq!(expired, NotificationExpired(id));
        assert!(center.expire(expired.0));
        assert!(!center.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_arrives_at_configured_delay() {
        let (mut center, mut rx) = center();
        let start = Instant::now();
        center.show_if_idle(NotificationKind::Success, "Logged Out Successfully");

        rx.recv().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(DEFAULT_CLEAR_DELAY_MS));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_notification_suppressed_while_visible() {
        let (mut center, _rx) = center();
        assert!(center.show_if_idle(NotificationKind::Error, "Incorrect login details"));
        assert!(!center.show_if_idle(NotificationKind::Error, "Error occurred"));

        assert_eq!(center.current().unwrap().text, "Incorrect login details");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_expiry_does_not_clear_newer_notification() {
        let (mut center, mut rx) = center();
        center.show_if_idle(NotificationKind::Error, "first");
        let first = center.current().unwrap().id;
        center.dismiss();

        center.show_if_idle(NotificationKind::Error, "second");
        let second = center.current().unwrap().id;
        assert_ne!(first, second);

        assert!(!center.expire(first));
        assert_eq!(center.current().unwrap().text, "second");

        // Only the live timer fires
        let expired = rx.recv().await.unwrap();
        assert_eq!(expired, NotificationExpired(second));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_cancels_timer() {
        let (mut center, mut rx) = center();
        center.show_if_idle(NotificationKind::Success, "done");
        center.dismiss();
        assert!(!center.is_active());

        tokio::time::advance(Duration::from_millis(5000)).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expires_at_is_delay_in_the_future() {
        let (mut center, _rx) = center();
        let before = Utc::now();
        center.show_if_idle(NotificationKind::Success, "ok");
        let n = center.current().unwrap();

        assert!(n.expires_at >= before + chrono::Duration::milliseconds(2000));
    }
}
