use std::sync::Arc;

use chrono::{DateTime, Duration, Local};

/// Gap after which a save no longer counts as continuous work on the same
/// project.
pub const IDLE_THRESHOLD: Duration = Duration::seconds(15 * 60);

/// Result of applying the idle/extend rule to a save moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// The save continues the current shift.
    Fresh,
    /// The gap exceeded [IDLE_THRESHOLD] and the shift should be cut.
    Stale,
}

/// An open accounting of continuous work on one project.
///
/// Mutable only while open. Closing consumes the record and produces an
/// immutable [ClosedShift]; there is no way back.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftRecord {
    project: Option<Arc<str>>,
    saved_files: Vec<Arc<str>>,
    start_time: DateTime<Local>,
    last_save: DateTime<Local>,
}

impl ShiftRecord {
    pub fn open(
        project: Option<Arc<str>>,
        file: Option<Arc<str>>,
        now: DateTime<Local>,
    ) -> Self {
        Self {
            project,
            saved_files: file.into_iter().collect(),
            start_time: now,
            last_save: now,
        }
    }

    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    pub fn start_time(&self) -> DateTime<Local> {
        self.start_time
    }

    pub fn last_save(&self) -> DateTime<Local> {
        self.last_save
    }

    pub fn saved_files(&self) -> &[Arc<str>] {
        &self.saved_files
    }

    pub fn add_file(&mut self, file: Option<Arc<str>>) {
        if let Some(file) = file {
            self.saved_files.push(file);
        }
    }

    /// The idle/extend rule. A fresh save moves `last_save` to `now`. A stale
    /// save advances `last_save` by exactly one threshold increment instead
    /// of crediting the whole idle gap.
    pub fn advance_last_save(&mut self, now: DateTime<Local>) -> Freshness {
        if self.last_save + IDLE_THRESHOLD < now {
            self.last_save = self.last_save + IDLE_THRESHOLD;
            Freshness::Stale
        } else {
            self.last_save = now;
            Freshness::Fresh
        }
    }

    /// Seals the record with its current bookkeeping. Used after a stale save
    /// has already capped `last_save` at the threshold boundary.
    pub fn finalize(self) -> ClosedShift {
        let elapsed = self.last_save - self.start_time;
        ClosedShift {
            project: self.project,
            saved_files: self.saved_files,
            start_time: self.start_time,
            last_save: self.last_save,
            elapsed,
        }
    }

    /// Explicit close: applies the idle rule's bookkeeping once more, then
    /// seals the record.
    pub fn close(mut self, now: DateTime<Local>) -> ClosedShift {
        self.advance_last_save(now);
        self.finalize()
    }
}

/// A fully accounted shift, ready to be persisted as a log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedShift {
    pub project: Option<Arc<str>>,
    pub saved_files: Vec<Arc<str>>,
    pub start_time: DateTime<Local>,
    pub last_save: DateTime<Local>,
    pub elapsed: Duration,
}
