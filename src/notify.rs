use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Severity of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Success,
}

/// A user-visible outcome message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(severity: Severity, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Sends notifications to whatever surface the embedding application wires
/// up. Cloneable and cheap to pass around; once every receiver is gone,
/// sends become no-ops rather than errors.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: UnboundedSender<Notification>,
}

impl Notifier {
    /// Creates a notifier together with the receiving end of its channel.
    pub fn channel() -> (Self, UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn notify(&self, notification: Notification) {
        // The dialog can outlive its message surface; a lost notification
        // is acceptable then.
        let _ = self.sender.send(notification);
    }

    pub fn error(&self, title: impl Into<String>, message: impl Into<String>) {
        self.notify(Notification::new(Severity::Error, title, message));
    }

    pub fn warning(&self, title: impl Into<String>, message: impl Into<String>) {
        self.notify(Notification::new(Severity::Warning, title, message));
    }

    pub fn info(&self, title: impl Into<String>, message: impl Into<String>) {
        self.notify(Notification::new(Severity::Info, title, message));
    }

    pub fn success(&self, title: impl Into<String>, message: impl Into<String>) {
        self.notify(Notification::new(Severity::Success, title, message));
    }
}
