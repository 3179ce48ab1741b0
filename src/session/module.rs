use anyhow::Result;

use super::events::SessionEvent;

/// Represents a consumer of session events. This should realistically be
/// able to abstract over different sinks: local log files, a remote server.
pub trait EventProcessor {
    fn process_next(
        &mut self,
        event: SessionEvent,
    ) -> impl std::future::Future<Output = Result<()>>;

    /// Called once after the event stream ends ("about to exit").
    fn finalize(&mut self) -> impl std::future::Future<Output = Result<()>>;
}
