//! User notifications (snackbar-style messages).
//!
//! The workflow emits messages through [`NotificationSink`]; rendering them is
//! up to the front end.

use std::fmt;

use parking_lot::Mutex;

/// Messages shown by the map workflow.
pub mod messages {
    pub const PICK_AREA: &str = "Click on the map to select the area you want to adopt.";
    pub const PICK_TEAM_HQ: &str = "Click on the map to select the team headquarters.";
    pub const AREA_ADOPTED: &str = "Area adopted successfully!";
    pub const TEAM_CREATED: &str = "Team created successfully!";
    pub const AREA_UPDATED: &str = "Area updated successfully!";
    pub const AREA_DELETED: &str = "Area deleted.";
    pub const SIGN_IN_REQUIRED: &str = "Please sign in to continue.";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message as handed to the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
    /// Stays visible until explicitly dismissed
    pub persistent: bool,
}

pub trait NotificationSink: Send + Sync {
    /// Show an auto-dismissing message.
    fn notify(&self, message: &str, severity: Severity);

    /// Show a message that stays until [`NotificationSink::dismiss`].
    fn show_persistent(&self, message: &str, severity: Severity);

    /// Hide whatever message is showing.
    fn dismiss(&self);
}

#[derive(Debug, Default)]
struct SnackbarInner {
    current: Option<Notice>,
    history: Vec<Notice>,
}

/// In-memory snackbar: one visible notice plus a history of everything shown.
#[derive(Debug, Default)]
pub struct Snackbar {
    inner: Mutex<SnackbarInner>,
}

impl Snackbar {
    pub fn new() -> Self {
        Self::default()
    }

    /// The notice currently on screen.
    pub fn current(&self) -> Option<Notice> {
        self.inner.lock().current.clone()
    }

    /// Every notice shown so far, oldest first.
    pub fn history(&self) -> Vec<Notice> {
        self.inner.lock().history.clone()
    }

    fn show(&self, notice: Notice) {
        match notice.severity {
            Severity::Error => tracing::warn!("notice: {}", notice.message),
            _ => tracing::info!("notice: {}", notice.message),
        }
        let mut inner = self.inner.lock();
        inner.history.push(notice.clone());
        inner.current = Some(notice);
    }
}

impl NotificationSink for Snackbar {
    fn notify(&self, message: &str, severity: Severity) {
        self.show(Notice {
            message: message.to_string(),
            severity,
            persistent: false,
        });
    }

    fn show_persistent(&self, message: &str, severity: Severity) {
        self.show(Notice {
            message: message.to_string(),
            severity,
            persistent: true,
        });
    }

    fn dismiss(&self) {
        self.inner.lock().current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistent_notice_until_dismissed() {
        let snackbar = Snackbar::new();
        snackbar.show_persistent(messages::PICK_AREA, Severity::Info);

        let current = snackbar.current().unwrap();
        assert!(current.persistent);
        assert_eq!(current.message, messages::PICK_AREA);

        snackbar.dismiss();
        assert!(snackbar.current().is_none());
        assert_eq!(snackbar.history().len(), 1);
    }

    #[test]
    fn test_notify_replaces_current() {
        let snackbar = Snackbar::new();
        snackbar.notify("first", Severity::Info);
        snackbar.notify("second", Severity::Error);

        let current = snackbar.current().unwrap();
        assert_eq!(current.message, "second");
        assert_eq!(current.severity, Severity::Error);
        assert!(!current.persistent);
    }
}
