pub mod condense;

use anyhow::Result;

/// Boundary to the host display surface. The engine only hands over finished
/// text; the host decides where it lands. For the CLI that is stdout, inside
/// an editor it would be a scratch buffer or panel.
#[cfg_attr(test, mockall::automock)]
pub trait DisplaySink {
    fn present(&mut self, title: &str, body: &str) -> Result<()>;
}

/// Writes reports to stdout.
pub struct StdoutDisplay;

impl DisplaySink for StdoutDisplay {
    fn present(&mut self, title: &str, body: &str) -> Result<()> {
        println!("{title}");
        println!("{body}");
        Ok(())
    }
}
