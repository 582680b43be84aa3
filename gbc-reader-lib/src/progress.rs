//! Transfer progress reporting.
//!
//! The session reports through [`TransferProgress`]. UI layers either
//! implement the trait directly or receive [`TransferEvent`]s over a
//! channel from the worker thread via [`ChannelProgress`].

use std::sync::mpsc::Sender;

/// Trait for receiving transfer progress updates.
///
/// `on_progress` is called once per byte of a bulk read, from the thread
/// running the transfer. Implementations are responsible for throttling
/// any expensive work.
pub trait TransferProgress {
    /// Called after each byte with `(bytes_read_so_far, total_bytes)`.
    fn on_progress(&self, current: u64, total: u64);

    /// Called when a transfer phase starts.
    fn on_phase(&self, _message: &str) {}

    /// Called for non-fatal problems (e.g. a checksum mismatch).
    fn on_warning(&self, _message: &str) {}

    /// Called when the transfer is complete.
    fn on_complete(&self, _message: &str) {}
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl TransferProgress for SilentProgress {
    fn on_progress(&self, _current: u64, _total: u64) {}
}

/// A progress reporter that logs to the `log` crate.
pub struct LogProgress;

impl TransferProgress for LogProgress {
    fn on_progress(&self, current: u64, total: u64) {
        if current.is_multiple_of(64 * 1024) || current == total {
            log::info!("  [{}/{}] bytes", current, total);
        }
    }

    fn on_phase(&self, message: &str) {
        log::info!("{}", message);
    }

    fn on_warning(&self, message: &str) {
        log::warn!("{}", message);
    }

    fn on_complete(&self, message: &str) {
        log::info!("{}", message);
    }
}

/// Progress update sent from a transfer worker.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferEvent {
    /// Bulk read has started
    Started { total_bytes: u64 },

    /// A transfer phase has started
    Phase { name: String },

    /// Bytes received so far
    Reading { bytes_read: u64, total_bytes: u64 },

    /// Non-fatal problem worth showing to the user
    Warning { message: String },

    /// Transfer finished successfully
    Completed,

    /// Transfer failed
    Failed { message: String },
}

impl TransferEvent {
    pub fn phase(name: impl Into<String>) -> Self {
        Self::Phase { name: name.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::Warning {
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Returns the progress percentage (0.0 to 1.0) if calculable.
    pub fn percentage(&self) -> Option<f64> {
        match self {
            Self::Started { .. } => Some(0.0),
            Self::Reading {
                bytes_read,
                total_bytes,
            } if *total_bytes > 0 => Some(*bytes_read as f64 / *total_bytes as f64),
            Self::Completed => Some(1.0),
            _ => None,
        }
    }
}

/// Forwards progress as [`TransferEvent`]s over an MPSC channel.
///
/// Byte-level updates are coalesced to one `Reading` event every `step`
/// bytes (plus the final byte) so the channel does not grow with ROM size.
/// Send errors are ignored: a UI that hung up just stops getting updates.
pub struct ChannelProgress {
    tx: Sender<TransferEvent>,
    step: u64,
}

impl ChannelProgress {
    pub const DEFAULT_STEP: u64 = 1024;

    pub fn new(tx: Sender<TransferEvent>) -> Self {
        Self::with_step(tx, Self::DEFAULT_STEP)
    }

    pub fn with_step(tx: Sender<TransferEvent>, step: u64) -> Self {
        Self {
            tx,
            step: step.max(1),
        }
    }

    pub fn send(&self, event: TransferEvent) {
        let _ = self.tx.send(event);
    }
}

impl TransferProgress for ChannelProgress {
    fn on_progress(&self, current: u64, total: u64) {
        if current == 1 {
            self.send(TransferEvent::Started { total_bytes: total });
        }
        if current.is_multiple_of(self.step) || current == total {
            self.send(TransferEvent::Reading {
                bytes_read: current,
                total_bytes: total,
            });
        }
    }

    fn on_phase(&self, message: &str) {
        self.send(TransferEvent::phase(message));
    }

    fn on_warning(&self, message: &str) {
        self.send(TransferEvent::warning(message));
    }

    fn on_complete(&self, _message: &str) {
        self.send(TransferEvent::Completed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_percentage() {
        let event = TransferEvent::Reading {
            bytes_read: 512,
            total_bytes: 2048,
        };
        assert_eq!(event.percentage(), Some(0.25));
        assert_eq!(TransferEvent::Completed.percentage(), Some(1.0));
        assert_eq!(TransferEvent::phase("x").percentage(), None);
        let empty = TransferEvent::Reading {
            bytes_read: 0,
            total_bytes: 0,
        };
        assert_eq!(empty.percentage(), None);
    }

    #[test]
    fn test_channel_progress_coalesces() {
        let (tx, rx) = mpsc::channel();
        let progress = ChannelProgress::with_step(tx, 100);
        for i in 1..=250 {
            progress.on_progress(i, 250);
        }
        progress.on_complete("done");
        drop(progress);

        let events: Vec<_> = rx.iter().collect();
        assert_eq!(
            events,
            vec![
                TransferEvent::Started { total_bytes: 250 },
                TransferEvent::Reading {
                    bytes_read: 100,
                    total_bytes: 250
                },
                TransferEvent::Reading {
                    bytes_read: 200,
                    total_bytes: 250
                },
                TransferEvent::Reading {
                    bytes_read: 250,
                    total_bytes: 250
                },
                TransferEvent::Completed,
            ]
        );
    }

    #[test]
    fn test_channel_progress_ignores_hangup() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let progress = ChannelProgress::new(tx);
        progress.on_progress(1, 1);
        progress.on_warning("still fine");
    }
}
