use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;
use tracing::warn;

use crate::utils::dir::create_application_default_path;

const DEFAULT_FILE_PREFIX: &str = "shiftlog";

/// Recognized log output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Txt,
}

impl LogFormat {
    fn parse(value: &str) -> Option<LogFormat> {
        match value {
            "json" => Some(LogFormat::Json),
            "txt" => Some(LogFormat::Txt),
            _ => None,
        }
    }
}

/// Normalized set of enabled output formats. The settings file may specify a
/// single value or a list; both collapse into this at load time. The set can
/// end up empty, in which case the writer falls back to console-only output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatSet {
    json: bool,
    txt: bool,
}

impl FormatSet {
    pub fn with(mut self, format: LogFormat) -> Self {
        self.insert(format);
        self
    }

    pub fn insert(&mut self, format: LogFormat) {
        match format {
            LogFormat::Json => self.json = true,
            LogFormat::Txt => self.txt = true,
        }
    }

    pub fn json(&self) -> bool {
        self.json
    }

    pub fn txt(&self) -> bool {
        self.txt
    }

    pub fn is_empty(&self) -> bool {
        !self.json && !self.txt
    }
}

/// Loaded, normalized settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Folder holding the month logs. Auto-created.
    pub log_folder: PathBuf,
    /// Prefix of the month log file names.
    pub log_file_name: String,
    pub formats: FormatSet,
}

#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    #[serde(default)]
    log_folder: FolderSetting,
    #[serde(default)]
    log_file_name: Option<String>,
    #[serde(default)]
    log_file_format: Option<FormatSetting>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FolderSetting {
    /// `false` in the settings file means "use the default folder".
    Disabled(bool),
    Path(PathBuf),
}

impl Default for FolderSetting {
    fn default() -> Self {
        Self::Disabled(false)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FormatSetting {
    One(String),
    Many(Vec<String>),
}

impl FormatSetting {
    fn into_values(self) -> Vec<String> {
        match self {
            FormatSetting::One(value) => vec![value],
            FormatSetting::Many(values) => values,
        }
    }
}

impl Settings {
    /// Reads settings from `path`, falling back to all defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => RawSettings::default(),
            Err(e) => return Err(e.into()),
        };
        Self::normalize(raw)
    }

    fn normalize(raw: RawSettings) -> Result<Self> {
        let log_folder = match raw.log_folder {
            FolderSetting::Path(path) => path,
            FolderSetting::Disabled(_) => create_application_default_path()?.join("shifts"),
        };
        std::fs::create_dir_all(&log_folder)?;

        let mut formats = FormatSet::default();
        for value in raw
            .log_file_format
            .map(FormatSetting::into_values)
            .unwrap_or_default()
        {
            match LogFormat::parse(&value) {
                Some(format) => formats.insert(format),
                None => warn!("Unrecognized log_file_format value {value:?}, ignoring"),
            }
        }

        Ok(Self {
            log_folder,
            log_file_name: raw
                .log_file_name
                .unwrap_or_else(|| DEFAULT_FILE_PREFIX.to_owned()),
            formats,
        })
    }
}
