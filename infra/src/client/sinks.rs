//! Navigation and notification sinks

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{error, info, warn};

use mw_core::client::{NavigationSink, NoticeKind, NotificationSink, Redirect};

/// Forwards redirects to a channel read by the embedding application
#[derive(Debug, Clone)]
pub struct ChannelNavigator {
    sender: UnboundedSender<Redirect>,
}

impl ChannelNavigator {
    pub fn new() -> (Self, UnboundedReceiver<Redirect>) {
        let (sender, receiver) = unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl NavigationSink for ChannelNavigator {
    fn navigate(&self, redirect: Redirect) {
        let path = redirect.step.path();
        if self.sender.send(redirect).is_err() {
            warn!(path = path, "Redirect dropped, navigation receiver is closed");
        }
    }
}

/// Writes toasts to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, message: &str, kind: NoticeKind) {
        match kind {
            NoticeKind::Success | NoticeKind::Info => info!(kind = ?kind, "{}", message),
            NoticeKind::Error => error!(kind = ?kind, "{}", message),
        }
    }
}
