use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde::Deserialize;
use serde::Serialize;

use crate::tracker::shift::ClosedShift;
use crate::utils::time::{format_timedelta, timestamp_to_string};

/// Project name shifts without project context are grouped under.
pub const MISC_PROJECT: &str = "Misc";

/// The persisted form of a closed shift. Field names follow the on-disk
/// layout; durations and dates are stored as the formatted strings the log
/// has always used (`H:MM:SS.ffffff` and `MM/DD/YYYY`).
#[derive(PartialEq, Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    #[serde(rename = "ProjectName", default)]
    pub project_name: Option<Arc<str>>,
    #[serde(rename = "Time", with = "timedelta_str")]
    pub time: Duration,
    #[serde(rename = "Date", with = "date_str")]
    pub date: NaiveDate,
    #[serde(rename = "FilesSaved")]
    pub files_saved: Vec<Arc<str>>,
    #[serde(rename = "FirstSave", default, skip_serializing_if = "Option::is_none")]
    pub first_save: Option<String>,
    #[serde(rename = "LastSave", default, skip_serializing_if = "Option::is_none")]
    pub last_save: Option<String>,
}

impl LogEntry {
    /// Project name as shown in reports.
    pub fn display_project(&self) -> &str {
        self.project_name.as_deref().unwrap_or(MISC_PROJECT)
    }

    /// Renders the entry as the human readable block appended to the plain
    /// text log.
    pub fn text_block(&self) -> String {
        let mut block = String::from("\n");
        block.push_str(&format!(
            "Project: {} - Time: {} - Date: {}\n",
            self.display_project(),
            format_timedelta(self.time),
            self.date.format("%m/%d/%Y"),
        ));
        if let Some(first_save) = &self.first_save {
            block.push_str(&format!("  * FirstSave: {first_save}\n"));
        }
        if let Some(last_save) = &self.last_save {
            block.push_str(&format!("  * LastSave: {last_save}\n"));
        }
        for file in &self.files_saved {
            block.push_str(&format!("\t- {file}\n"));
        }
        block.push('\n');
        block
    }
}

impl From<ClosedShift> for LogEntry {
    fn from(shift: ClosedShift) -> Self {
        LogEntry {
            project_name: shift.project,
            time: shift.elapsed,
            date: shift.last_save.date_naive(),
            files_saved: shift.saved_files,
            first_save: Some(timestamp_to_string(shift.start_time)),
            last_save: Some(timestamp_to_string(shift.last_save)),
        }
    }
}

mod timedelta_str {
    use chrono::Duration;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use crate::utils::time::{format_timedelta, parse_timedelta};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_timedelta(*duration))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_timedelta(&s).map_err(serde::de::Error::custom)
    }
}

mod date_str {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%m/%d/%Y";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}
