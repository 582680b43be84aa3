//! Run a ROM dump on a background thread.
//!
//! The session moves into the worker and comes back through
//! [`TransferHandle::join`], so the link never has two owners. Progress
//! arrives on the handle's event channel; the UI thread polls it.

use std::io::{Read, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::thread::JoinHandle;

use gbc_reader_core::ChecksumReport;

use crate::ReaderError;
use crate::progress::{ChannelProgress, TransferEvent};
use crate::session::TransferSession;

/// What a completed dump produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferSummary {
    pub bytes: usize,
    pub checksum: ChecksumReport,
}

/// The session handed back by the worker, with the dump result.
pub struct TransferOutcome<S> {
    pub session: TransferSession<S>,
    pub result: Result<TransferSummary, ReaderError>,
}

/// Handle to a running background dump.
pub struct TransferHandle<S> {
    events: Receiver<TransferEvent>,
    cancel: Arc<AtomicBool>,
    thread: JoinHandle<TransferOutcome<S>>,
}

/// Start the data read of `session` on a new thread.
///
/// The session must already be in `HeaderRead`; otherwise the worker
/// finishes at once with `InvalidState`. Setting `cancel` (or calling
/// [`TransferHandle::cancel`]) stops the read between bytes.
pub fn spawn_rom_read<S>(mut session: TransferSession<S>, cancel: Arc<AtomicBool>) -> TransferHandle<S>
where
    S: Read + Write + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let token = cancel.clone();

    let thread = std::thread::spawn(move || {
        let progress = ChannelProgress::new(tx);
        let read = session
            .read_rom(&progress, &token)
            .map(|cartridge| cartridge.rom_size().byte_len());
        let result = read.and_then(|bytes| {
            session
                .verify_checksum()
                .map(|checksum| TransferSummary { bytes, checksum })
        });
        if let Err(e) = &result {
            progress.send(TransferEvent::failed(e.to_string()));
        }
        TransferOutcome { session, result }
    });

    TransferHandle {
        events: rx,
        cancel,
        thread,
    }
}

impl<S> TransferHandle<S> {
    /// Progress events from the worker. Disconnects once the worker exits.
    pub fn events(&self) -> &Receiver<TransferEvent> {
        &self.events
    }

    /// Ask the worker to stop. The session closes its link when it notices.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn cancel_token(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the worker and take the session back.
    pub fn join(self) -> Result<TransferOutcome<S>, ReaderError> {
        self.thread.join().map_err(|_| ReaderError::WorkerPanicked)
    }
}
