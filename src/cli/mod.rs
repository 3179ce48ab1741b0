pub mod output;
pub mod track;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use crate::{
    config::Settings,
    storage::log_reader::LogReader,
    utils::{
        clock::{Clock, DefaultClock},
        dir::create_application_default_path,
        logging::enable_logging,
        time::month_of,
    },
};

use output::{
    condense::{condense, render},
    DisplaySink, StdoutDisplay,
};

#[derive(Parser, Debug)]
#[command(name = "Shiftlog", version)]
#[command(about = "Shift based time tracking for editor save events", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        help = "Settings file. Defaults to settings.json in the application directory"
    )]
    settings: Option<PathBuf>,
    #[arg(long, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "List months that have shift logs, newest first")]
    Months {},
    #[command(about = "Display the condensed per-date, per-project report for a month")]
    Report {
        #[arg(long, help = "Month to display, e.g. 2025-03. Defaults to the current month")]
        month: Option<String>,
    },
    #[command(
        about = "Track save events read from stdin, one per line as project<TAB>filepath"
    )]
    Track {},
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = create_application_default_path()?;
    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(&app_dir, logging_level, args.log)?;

    let settings_path = args
        .settings
        .unwrap_or_else(|| app_dir.join("settings.json"));
    let settings = Settings::load(&settings_path)?;

    match args.commands {
        Commands::Months {} => {
            let reader = LogReader::new(
                settings.log_folder.clone(),
                settings.log_file_name.clone(),
            );
            for month in reader.list_months().await? {
                println!("{month}");
            }
            Ok(())
        }
        Commands::Report { month } => {
            let month =
                month.unwrap_or_else(|| month_of(DefaultClock.time().date_naive()));
            run_report(&settings, &month, &mut StdoutDisplay).await
        }
        Commands::Track {} => track::process_track_command(&settings).await,
    }
}

/// Loads a month, condenses it and hands the text to the display surface.
pub async fn run_report(
    settings: &Settings,
    month: &str,
    display: &mut impl DisplaySink,
) -> Result<()> {
    let reader = LogReader::new(
        settings.log_folder.clone(),
        settings.log_file_name.clone(),
    );
    let entries = reader.load_month(month).await?;
    let report = render(&condense(&entries));
    display.present(&format!("Shift log {month}"), &report)
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{Duration, NaiveDate};
    use tempfile::tempdir;

    use crate::{
        config::{FormatSet, LogFormat},
        storage::{entities::LogEntry, log_writer::LogWriter},
    };

    use super::{output::MockDisplaySink, *};

    #[tokio::test]
    async fn test_report_reaches_the_display_sink() -> Result<()> {
        let dir = tempdir()?;
        let writer = LogWriter::new(
            dir.path().to_owned(),
            "worklog".into(),
            FormatSet::default().with(LogFormat::Json),
        )?;
        writer
            .append(&LogEntry {
                project_name: Some("foo".into()),
                time: Duration::minutes(25),
                date: NaiveDate::from_ymd_opt(2018, 7, 4).unwrap(),
                files_saved: vec![],
                first_save: Some("2018-07-04 10:00:00.000000".into()),
                last_save: Some("2018-07-04 10:25:00.000000".into()),
            })
            .await?;

        let settings = Settings {
            log_folder: dir.path().to_owned(),
            log_file_name: "worklog".into(),
            formats: FormatSet::default().with(LogFormat::Json),
        };

        let mut display = MockDisplaySink::new();
        display
            .expect_present()
            .withf(|title, body| {
                title.contains("2018-07") && body.contains("foo - Time: 0:25:00")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        run_report(&settings, "2018-07", &mut display).await
    }

    #[tokio::test]
    async fn test_report_for_missing_month_fails_loudly() -> Result<()> {
        let dir = tempdir()?;
        let settings = Settings {
            log_folder: dir.path().to_owned(),
            log_file_name: "worklog".into(),
            formats: FormatSet::default(),
        };

        let mut display = MockDisplaySink::new();
        display.expect_present().times(0);

        assert!(run_report(&settings, "2018-07", &mut display).await.is_err());
        Ok(())
    }
}
