use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: UnboundedSender<Notice>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: Notice) {
        if self.tx.send(notice).is_err() {
            warn!("Notice dropped: receiver closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_delivers_in_order() {
        let (notifier, mut rx) = ChannelNotifier::new();
        notifier.notify(Notice::success("one"));
        notifier.notify(Notice::error("two"));
        assert_eq!(rx.try_recv().unwrap(), Notice::success("one"));
        let second = rx.try_recv().unwrap();
        assert_eq!(second.severity, Severity::Error);
        assert_eq!(second.message, "two");
    }

    #[test]
    fn closed_channel_does_not_panic() {
        let (notifier, rx) = ChannelNotifier::new();
        drop(rx);
        notifier.notify(Notice::success("ignored"));
    }
}
