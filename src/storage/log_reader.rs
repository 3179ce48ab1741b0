use std::{io::ErrorKind, path::PathBuf};

use fs4::tokio::AsyncFileExt;
use thiserror::Error;
use tokio::{fs::File, io::AsyncReadExt};
use tracing::debug;

use super::entities::LogEntry;
use super::log_writer::{month_file_name, STRUCTURED_EXT, TEXT_EXT};

/// Errors surfaced when reading logs for display. The caller decides how
/// loudly to report them; none of these degrade to a silent empty result.
#[derive(Debug, Error)]
pub enum LogReadError {
    #[error("no shift log found for {0}")]
    NotFound(String),
    #[error("shift log {path:?} is corrupted at line {line}")]
    Corrupted {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Loads persisted shift entries back from the month logs.
pub struct LogReader {
    log_folder: PathBuf,
    file_prefix: String,
}

impl LogReader {
    pub fn new(log_folder: PathBuf, file_prefix: String) -> Self {
        Self {
            log_folder,
            file_prefix,
        }
    }

    /// Month identifiers that have at least one log file, newest first.
    /// Only the folder's immediate entries are considered.
    pub async fn list_months(&self) -> Result<Vec<String>, LogReadError> {
        let mut read_dir = match tokio::fs::read_dir(&self.log_folder).await {
            Ok(v) => v,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e.into()),
        };

        let marker = format!("{}--", self.file_prefix);
        let mut months = Vec::<String>::new();
        while let Some(dir_entry) = read_dir.next_entry().await? {
            let name = dir_entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(stem) = name.strip_prefix(&marker) else {
                continue;
            };
            let stem = stem
                .strip_suffix(&format!(".{STRUCTURED_EXT}"))
                .or_else(|| stem.strip_suffix(&format!(".{TEXT_EXT}")));
            let Some(stem) = stem else { continue };
            if !months.iter().any(|month| month == stem) {
                months.push(stem.to_owned());
            }
        }

        // YYYY-MM stems, so descending string order is reverse-chronological.
        months.sort();
        months.reverse();
        Ok(months)
    }

    /// Parses the month's structured log in stored order. Entries are not
    /// re-sorted; the append order is trusted to be chronological.
    pub async fn load_month(&self, month: &str) -> Result<Vec<LogEntry>, LogReadError> {
        let path = self
            .log_folder
            .join(month_file_name(&self.file_prefix, month, STRUCTURED_EXT));
        debug!("Extracting {path:?}");

        let mut file = match File::open(&path).await {
            Ok(v) => v,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(LogReadError::NotFound(month.to_owned()))
            }
            Err(e) => return Err(e.into()),
        };

        file.lock_shared()?;
        let mut raw = String::new();
        let read = file.read_to_string(&mut raw).await;
        file.unlock_async().await?;
        read?;

        let mut entries = Vec::new();
        for (index, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<LogEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(source) => {
                    return Err(LogReadError::Corrupted {
                        path,
                        line: index + 1,
                        source,
                    })
                }
            }
        }
        Ok(entries)
    }
}
