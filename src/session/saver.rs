use anyhow::Result;
use tracing::{debug, info};

use crate::{
    storage::{entities::LogEntry, log_writer::LogWriter},
    tracker::{shift::ClosedShift, ShiftTracker},
    utils::clock::Clock,
};

use super::{
    events::{SaveEvent, SessionEvent},
    module::EventProcessor,
};

/// Bridges the session event stream and the log files. Owns the tracker
/// state for the lifetime of the editing session.
pub struct ShiftSaver {
    tracker: ShiftTracker,
    writer: LogWriter,
    clock: Box<dyn Clock>,
}

impl ShiftSaver {
    pub fn new(writer: LogWriter, clock: Box<dyn Clock>) -> Self {
        Self {
            tracker: ShiftTracker::new(),
            writer,
            clock,
        }
    }

    async fn on_save(&mut self, event: SaveEvent) -> Result<()> {
        if let Some(closed) = self
            .tracker
            .on_save(event.project, event.file, event.timestamp)
        {
            self.persist(closed).await?;
        }
        Ok(())
    }

    /// Window-close flush. Flushes only when the idle rule still judges the
    /// shift fresh; a stale shift stays open for a later save to close.
    async fn on_window_closing(&mut self, context: SaveEvent) -> Result<()> {
        if self
            .tracker
            .check_shift(context.project.as_deref(), context.file, context.timestamp)
        {
            if let Some(closed) = self.tracker.close(context.timestamp) {
                self.persist(closed).await?;
            }
        } else {
            debug!("Shift already stale on window close, leaving it open");
        }
        Ok(())
    }

    async fn persist(&mut self, closed: ClosedShift) -> Result<()> {
        let entry = LogEntry::from(closed);
        self.writer.append(&entry).await?;
        info!(project = entry.display_project(), "Persisted shift");
        Ok(())
    }
}

impl EventProcessor for ShiftSaver {
    async fn process_next(&mut self, event: SessionEvent) -> Result<()> {
        match event {
            SessionEvent::Save(save) => self.on_save(save).await,
            SessionEvent::WindowClosing(context) => self.on_window_closing(context).await,
        }
    }

    async fn finalize(&mut self) -> Result<()> {
        let now = self.clock.time();
        if let Some(closed) = self.tracker.close(now) {
            self.persist(closed).await?;
        }
        Ok(())
    }
}
