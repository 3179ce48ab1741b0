use std::path::PathBuf;

use anyhow::Result;
use fs4::tokio::AsyncFileExt;
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::info;

use crate::config::FormatSet;
use crate::utils::time::month_of;

use super::entities::LogEntry;

/// File extension of the structured, line-delimited JSON log.
pub const STRUCTURED_EXT: &str = "jsonl";
/// File extension of the human readable log.
pub const TEXT_EXT: &str = "txt";

pub fn month_file_name(prefix: &str, month: &str, ext: &str) -> String {
    format!("{prefix}--{month}.{ext}")
}

/// Appends closed shifts to the month's log files, in every enabled format.
///
/// The structured log is one JSON object per line, appended under an
/// exclusive lock. A plain append keeps the file well formed no matter where
/// a previous write was cut off, which the bracketed-array layout this
/// replaced could not guarantee.
pub struct LogWriter {
    log_folder: PathBuf,
    file_prefix: String,
    formats: FormatSet,
}

impl LogWriter {
    pub fn new(
        log_folder: PathBuf,
        file_prefix: String,
        formats: FormatSet,
    ) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&log_folder)?;

        Ok(Self {
            log_folder,
            file_prefix,
            formats,
        })
    }

    fn month_path(&self, month: &str, ext: &str) -> PathBuf {
        self.log_folder
            .join(month_file_name(&self.file_prefix, month, ext))
    }

    /// Durably appends one entry. The month file is chosen from the entry's
    /// date. An empty format set degrades to a console-only message instead
    /// of failing.
    pub async fn append(&self, entry: &LogEntry) -> Result<()> {
        let month = month_of(entry.date);

        if self.formats.is_empty() {
            info!(
                "No recognized log_file_format configured, entry not persisted:{}",
                entry.text_block()
            );
            return Ok(());
        }
        if self.formats.json() {
            self.append_structured(&month, entry).await?;
        }
        if self.formats.txt() {
            self.append_text(&month, entry).await?;
        }
        Ok(())
    }

    async fn append_structured(&self, month: &str, entry: &LogEntry) -> Result<()> {
        let mut file = File::options()
            .append(true)
            .create(true)
            .open(self.month_path(month, STRUCTURED_EXT))
            .await?;

        // Semi-safe acquire-release for the file
        file.lock_exclusive()?;
        let result = async {
            let mut buffer = serde_json::to_vec(entry)?;
            buffer.push(b'\n');
            file.write_all(&buffer).await?;
            file.flush().await?;
            Ok(())
        }
        .await;
        file.unlock_async().await?;
        result
    }

    async fn append_text(&self, month: &str, entry: &LogEntry) -> Result<()> {
        let mut file = File::options()
            .append(true)
            .create(true)
            .open(self.month_path(month, TEXT_EXT))
            .await?;

        file.write_all(entry.text_block().as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
