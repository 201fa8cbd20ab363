//! Notification surface.
//!
//! The page shell renders toasts and modal dialogs; the client layer only
//! decides *when* to show one and with which severity. Pages without a
//! notification area install [`NullNotifier`] — headless operation is
//! first-class, not an error.

use std::cell::RefCell;

// ── Types ───────────────────────────────────────────────────

/// Severity of a notice, mapped onto the page's alert styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Danger,
}

impl NoticeLevel {
    /// Style name used by the page shell (Bootstrap alert suffix).
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Danger => "danger",
        }
    }
}

/// A single notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

// ── Capability trait ────────────────────────────────────────

/// The page's toast/modal surface.
pub trait Notifier {
    /// Transient banner, auto-dismissed by the shell.
    fn toast(&self, level: NoticeLevel, message: &str);

    /// Blocking confirmation dialog with a title and body.
    fn modal(&self, title: &str, body: &str, level: NoticeLevel);
}

/// No-op notifier for pages without a notification area.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn toast(&self, _level: NoticeLevel, _message: &str) {}
    fn modal(&self, _title: &str, _body: &str, _level: NoticeLevel) {}
}

// ── Test support ────────────────────────────────────────────

/// Collects every notice for assertions. Shared by the cart and order
/// crates' tests, so it lives here rather than behind `#[cfg(test)]`.
#[derive(Default)]
pub struct RecordingNotifier {
    toasts: RefCell<Vec<Notice>>,
    modals: RefCell<Vec<(String, Notice)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toasts(&self) -> Vec<Notice> {
        self.toasts.borrow().clone()
    }

    pub fn modals(&self) -> Vec<(String, Notice)> {
        self.modals.borrow().clone()
    }

    /// Last toast shown, if any.
    pub fn last_toast(&self) -> Option<Notice> {
        self.toasts.borrow().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn toast(&self, level: NoticeLevel, message: &str) {
        self.toasts.borrow_mut().push(Notice {
            level,
            message: String::from(message),
        });
    }

    fn modal(&self, title: &str, body: &str, level: NoticeLevel) {
        self.modals.borrow_mut().push((
            String::from(title),
            Notice {
                level,
                message: String::from(body),
            },
        ));
    }
}

// ── Tests ───────────────────────────────────────────────────
