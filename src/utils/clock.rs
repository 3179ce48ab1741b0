use chrono::{DateTime, Local};

/// Represents an entity responsible for providing dates across the
/// application. This allows time to be injected during testing.
pub trait Clock: Send + Sync + 'static {
    fn time(&self) -> DateTime<Local>;
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Local> {
        Local::now()
    }
}
