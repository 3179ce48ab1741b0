use std::sync::Arc;

use chrono::{DateTime, Local};

/// A "file was saved, in project P, at path F" notification from the host
/// editor. Both the project and the path may be absent.
#[derive(Debug, Clone)]
pub struct SaveEvent {
    pub project: Option<Arc<str>>,
    /// Path of the saved file, already truncated by the host.
    pub file: Option<Arc<str>>,
    pub timestamp: DateTime<Local>,
}

/// Events delivered serially to the session's processor. Each one runs to
/// completion before the next is taken off the channel.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Save(SaveEvent),
    /// The host window is about to close. Carries the save context of the
    /// window's active view so the open shift can be matched against it.
    WindowClosing(SaveEvent),
}
