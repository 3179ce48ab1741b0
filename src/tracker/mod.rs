//! The shift-tracking state machine. A shift is a contiguous block of work
//! on one project, bounded by save events and a 15 minute idle threshold.

pub mod shift;

use std::sync::Arc;

use chrono::{DateTime, Local};
use shift::{ClosedShift, Freshness, ShiftRecord};
use tracing::debug;

/// Decides, per save event, whether continuous work extends the open shift or
/// cuts it and starts a new one. Holds at most one open record; there is no
/// global state, the owner of the tracker owns the session.
#[derive(Debug, Default)]
pub struct ShiftTracker {
    current: Option<ShiftRecord>,
}

impl ShiftTracker {
    pub fn new() -> Self {
        Self { current: None }
    }

    pub fn current(&self) -> Option<&ShiftRecord> {
        self.current.as_ref()
    }

    /// Feeds one save event through the machine. Returns the previous shift
    /// when this event cut it; the caller is responsible for persisting it.
    pub fn on_save(
        &mut self,
        project: Option<Arc<str>>,
        file: Option<Arc<str>>,
        now: DateTime<Local>,
    ) -> Option<ClosedShift> {
        let Some(record) = self.current.as_mut() else {
            debug!(project = ?project, "opening shift");
            self.current = Some(ShiftRecord::open(project, file, now));
            return None;
        };

        if record.project() != project.as_deref() {
            // Work moved to another project. The idle gap is irrelevant here,
            // the shift ends either way.
            let closed = self.current.take().map(|record| record.close(now));
            self.current = Some(ShiftRecord::open(project, file, now));
            return closed;
        }

        match record.advance_last_save(now) {
            Freshness::Fresh => {
                record.add_file(file);
                None
            }
            Freshness::Stale => {
                // `last_save` is already capped at one threshold past the
                // previous activity; seal without touching it again.
                let closed = self.current.take().map(ShiftRecord::finalize);
                self.current = Some(ShiftRecord::open(project, file, now));
                closed
            }
        }
    }

    /// Answers "is this shift still mine?" for the given save context.
    ///
    /// A fresh answer appends the file to the open record as a side effect.
    /// A stale answer leaves the record open with its capped `last_save`, so
    /// a later save can close it.
    pub fn check_shift(
        &mut self,
        project: Option<&str>,
        file: Option<Arc<str>>,
        now: DateTime<Local>,
    ) -> bool {
        let Some(record) = self.current.as_mut() else {
            return false;
        };
        if record.project() != project {
            return false;
        }
        match record.advance_last_save(now) {
            Freshness::Fresh => {
                record.add_file(file);
                true
            }
            Freshness::Stale => false,
        }
    }

    /// Explicitly closes the open shift, if any. Applies the idle rule's
    /// bookkeeping once more before sealing.
    pub fn close(&mut self, now: DateTime<Local>) -> Option<ClosedShift> {
        self.current.take().map(|record| record.close(now))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, TimeZone};

    use super::*;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local
            .from_local_datetime(
                &NaiveDate::from_ymd_opt(2018, 7, 4)
                    .unwrap()
                    .and_hms_opt(h, m, s)
                    .unwrap(),
            )
            .single()
            .unwrap()
    }

    fn foo() -> Option<Arc<str>> {
        Some("foo".into())
    }

    #[test]
    fn saves_within_threshold_form_one_shift() {
        let mut tracker = ShiftTracker::new();

        assert!(tracker.on_save(foo(), Some("a.rs".into()), at(10, 0, 0)).is_none());
        assert!(tracker.on_save(foo(), Some("b.rs".into()), at(10, 5, 0)).is_none());
        assert!(tracker.on_save(foo(), Some("c.rs".into()), at(10, 14, 0)).is_none());

        let record = tracker.current().unwrap();
        assert_eq!(record.start_time(), at(10, 0, 0));
        assert_eq!(record.last_save(), at(10, 14, 0));
        assert_eq!(record.saved_files().len(), 3);
    }

    #[test]
    fn stale_save_splits_at_threshold_boundary() {
        let mut tracker = ShiftTracker::new();

        assert!(tracker.on_save(foo(), Some("a.rs".into()), at(10, 0, 0)).is_none());
        assert!(tracker.on_save(foo(), Some("b.rs".into()), at(10, 10, 0)).is_none());

        // 20 minute gap: the previous shift is cut 15 minutes past its last
        // real activity, the new one starts at the triggering save.
        let closed = tracker
            .on_save(foo(), Some("c.rs".into()), at(10, 30, 0))
            .unwrap();
        assert_eq!(closed.start_time, at(10, 0, 0));
        assert_eq!(closed.last_save, at(10, 25, 0));
        assert_eq!(closed.elapsed, Duration::minutes(25));
        assert_eq!(closed.saved_files.len(), 2);

        let record = tracker.current().unwrap();
        assert_eq!(record.start_time(), at(10, 30, 0));
        assert_eq!(record.saved_files(), &[Arc::<str>::from("c.rs")]);
    }

    #[test]
    fn different_project_closes_regardless_of_gap() {
        let mut tracker = ShiftTracker::new();

        assert!(tracker.on_save(foo(), Some("a.rs".into()), at(10, 0, 0)).is_none());

        let closed = tracker
            .on_save(Some("bar".into()), Some("d.rs".into()), at(10, 5, 0))
            .unwrap();
        assert_eq!(closed.project.as_deref(), Some("foo"));
        assert_eq!(closed.last_save, at(10, 5, 0));
        assert_eq!(closed.elapsed, Duration::minutes(5));

        assert_eq!(tracker.current().unwrap().project(), Some("bar"));
    }

    #[test]
    fn missing_project_is_its_own_group() {
        let mut tracker = ShiftTracker::new();

        assert!(tracker.on_save(None, Some("a.rs".into()), at(10, 0, 0)).is_none());
        assert!(tracker.on_save(None, Some("b.rs".into()), at(10, 1, 0)).is_none());

        let closed = tracker.on_save(foo(), None, at(10, 2, 0)).unwrap();
        assert_eq!(closed.project, None);
        assert_eq!(closed.saved_files.len(), 2);
    }

    #[test]
    fn explicit_close_is_guarded_when_empty() {
        let mut tracker = ShiftTracker::new();
        assert!(tracker.close(at(10, 0, 0)).is_none());

        tracker.on_save(foo(), None, at(10, 0, 0));
        let closed = tracker.close(at(10, 10, 0)).unwrap();
        assert_eq!(closed.elapsed, Duration::minutes(10));

        assert!(tracker.close(at(10, 11, 0)).is_none());
    }

    #[test]
    fn check_shift_fresh_appends_file() {
        let mut tracker = ShiftTracker::new();
        tracker.on_save(foo(), Some("a.rs".into()), at(10, 0, 0));

        assert!(tracker.check_shift(Some("foo"), Some("b.rs".into()), at(10, 5, 0)));

        let record = tracker.current().unwrap();
        assert_eq!(record.saved_files().len(), 2);
        assert_eq!(record.last_save(), at(10, 5, 0));
    }

    #[test]
    fn check_shift_stale_keeps_capped_record_open() {
        let mut tracker = ShiftTracker::new();
        tracker.on_save(foo(), Some("a.rs".into()), at(10, 0, 0));

        assert!(!tracker.check_shift(Some("foo"), Some("b.rs".into()), at(10, 30, 0)));

        let record = tracker.current().unwrap();
        assert_eq!(record.saved_files().len(), 1);
        assert_eq!(record.last_save(), at(10, 15, 0));
    }

    #[test]
    fn check_shift_other_project_does_not_mutate() {
        let mut tracker = ShiftTracker::new();
        tracker.on_save(foo(), Some("a.rs".into()), at(10, 0, 0));

        assert!(!tracker.check_shift(Some("bar"), Some("b.rs".into()), at(10, 5, 0)));
        assert_eq!(tracker.current().unwrap().last_save(), at(10, 0, 0));

        assert!(!tracker.check_shift(None, None, at(10, 5, 0)));
    }
}
