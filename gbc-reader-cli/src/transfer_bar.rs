//! Progress bar for ROM transfers.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use gbc_reader_lib::TransferEvent;

/// A byte-count progress bar fed from worker [`TransferEvent`]s.
pub(crate) struct TransferBar {
    bar: ProgressBar,
}

impl TransferBar {
    /// Create a bar for `total` bytes. When `quiet` is true the bar is hidden.
    pub(crate) fn new(total: u64, quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::hidden())
        } else {
            ProgressBar::new(total)
        };

        let style = ProgressStyle::with_template(
            "  {msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
        )
        .expect("static pattern")
        .progress_chars("=> ");
        bar.set_style(style);

        Self { bar }
    }

    /// Apply one event. Warnings are printed above the bar.
    pub(crate) fn handle(&self, event: TransferEvent) {
        match event {
            TransferEvent::Started { total_bytes } => {
                self.bar.set_length(total_bytes);
                self.bar.set_position(0);
            }
            TransferEvent::Phase { name } => self.bar.set_message(name),
            TransferEvent::Reading { bytes_read, .. } => self.bar.set_position(bytes_read),
            TransferEvent::Warning { message } => {
                self.bar.suspend(|| log::warn!("{}", message));
            }
            TransferEvent::Completed => self.bar.finish_with_message("Done"),
            TransferEvent::Failed { message } => self.bar.abandon_with_message(message),
        }
    }

    /// Clear the bar if the transfer ended without a final event.
    pub(crate) fn finish(&self) {
        if !self.bar.is_finished() {
            self.bar.abandon();
        }
    }
}
