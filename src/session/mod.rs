//! The host-integration layer. Save and shutdown notifications arrive
//! serially on a channel; the tracker has no internal concurrency and every
//! event runs to completion before the next is processed. Closing the
//! channel is the "about to exit" signal and flushes the open shift.

pub mod events;
pub mod module;
pub mod saver;
pub mod shutdown;

use anyhow::Result;
use events::SessionEvent;
use module::EventProcessor;
use saver::ShiftSaver;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tracing::{debug, error, info};

use crate::{config::Settings, storage::log_writer::LogWriter, utils::clock::Clock};

/// Drives an [EventProcessor] from a channel of session events.
pub struct SessionModule<Processor> {
    receiver: Receiver<SessionEvent>,
    processor: Processor,
}

impl<P: EventProcessor> SessionModule<P> {
    pub fn new(receiver: Receiver<SessionEvent>, processor: P) -> Self {
        Self {
            receiver,
            processor,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        while let Some(event) = self.receiver.recv().await {
            debug!("Processing event {:?}", event);
            match self.processor.process_next(event.clone()).await {
                Ok(_) => {
                    info!("Processed event {:?}", event)
                }
                Err(e) => {
                    error!("Error processing event {:?}: {e:?}", event)
                }
            }
        }

        let result = self.processor.finalize().await;
        self.receiver.close();
        result
    }
}

/// Creates a ready-to-run session for the given settings. The returned
/// sender is the host's entry point; dropping it ends the session and
/// triggers the exit flush.
pub fn create_session(
    settings: &Settings,
    clock: impl Clock,
) -> Result<(Sender<SessionEvent>, SessionModule<ShiftSaver>)> {
    let (sender, receiver) = mpsc::channel::<SessionEvent>(10);
    let writer = LogWriter::new(
        settings.log_folder.clone(),
        settings.log_file_name.clone(),
        settings.formats,
    )?;
    let saver = ShiftSaver::new(writer, Box::new(clock));
    Ok((sender, SessionModule::new(receiver, saver)))
}
