use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Local};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::Sender;
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::{
    config::Settings,
    session::{
        create_session,
        events::{SaveEvent, SessionEvent},
        shutdown,
    },
    utils::clock::{Clock, DefaultClock},
};

/// Reads save events from stdin and feeds them through the session loop.
/// One event per line, `project<TAB>filepath`; a line without a tab is a
/// save with no project context. EOF or ctrl-c ends the session and flushes
/// the open shift.
pub async fn process_track_command(settings: &Settings) -> Result<()> {
    let (sender, session) = create_session(settings, DefaultClock)?;

    let shutdown_token = CancellationToken::new();
    tokio::spawn(shutdown::detect_shutdown(shutdown_token.clone()));

    let (feed_result, session_result) = tokio::join!(
        feed_stdin(sender, shutdown_token),
        session.run(),
    );

    feed_result?;
    session_result
}

async fn feed_stdin(sender: Sender<SessionEvent>, shutdown: CancellationToken) -> Result<()> {
    let clock = DefaultClock;
    let mut lines = BufReader::new(io::stdin()).lines();
    loop {
        let line = tokio::select! {
            _ = shutdown.cancelled() => return Ok(()),
            line = lines.next_line() => line?,
        };
        // None means stdin closed; dropping the sender ends the session.
        let Some(line) = line else { return Ok(()) };
        let Some(event) = parse_save_line(&line, clock.time()) else {
            continue;
        };
        sender
            .send(SessionEvent::Save(event))
            .await
            .inspect_err(|e| error!("Session loop stopped before stdin ended {e:?}"))?;
    }
}

fn parse_save_line(line: &str, timestamp: DateTime<Local>) -> Option<SaveEvent> {
    let line = line.trim_end_matches('\r');
    if line.trim().is_empty() {
        return None;
    }
    let (project, file) = match line.split_once('\t') {
        Some((project, file)) => (project, file),
        None => ("", line),
    };
    let project = (!project.is_empty()).then(|| Arc::<str>::from(project));
    let file = (!file.is_empty()).then(|| Arc::<str>::from(file));
    Some(SaveEvent {
        project,
        file,
        timestamp,
    })
}
