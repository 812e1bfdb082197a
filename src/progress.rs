use std::fmt;
use std::sync::mpsc;

use log::{debug, info};

/// Milestones reported while splitting an atlas, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// Decoding the source image (pipeline only)
    Reading,
    /// Raster scan started
    Scanning,
    /// Raster scan finished
    Found { count: usize },
    /// About to export sprite `current` of `total` (1-based)
    Saving { current: usize, total: usize },
    /// All sprites exported
    Done,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Progress::Reading => write!(f, "Reading image..."),
            Progress::Scanning => write!(f, "Scanning image..."),
            Progress::Found { count } => write!(f, "Found {} components. Saving...", count),
            Progress::Saving { current, total } => {
                write!(f, "Saving sprite {}/{}...", current, total)
            }
            Progress::Done => write!(f, "Done."),
        }
    }
}

/// Receiver of progress events.
///
/// Implementations should be cheap; the scanner and exporter call this
/// synchronously and do not buffer.
pub trait ProgressSink {
    fn report(&mut self, event: &Progress);
}

impl<F: FnMut(&Progress)> ProgressSink for F {
    fn report(&mut self, event: &Progress) {
        self(event)
    }
}

/// Discards all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _event: &Progress) {}
}

/// Logs each event at `info` level, prefixed with a label (usually the
/// source file name)
#[derive(Debug, Clone)]
pub struct LogProgress {
    label: String,
}

impl LogProgress {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl ProgressSink for LogProgress {
    fn report(&mut self, event: &Progress) {
        info!("{}: {}", self.label, event);
    }
}

/// Forwards events over a channel so another thread (e.g. a UI loop) can
/// consume them
#[derive(Debug, Clone)]
pub struct ChannelProgress {
    sender: mpsc::Sender<Progress>,
}

impl ChannelProgress {
    pub fn new(sender: mpsc::Sender<Progress>) -> Self {
        Self { sender }
    }

    /// Create a connected sink/receiver pair
    pub fn channel() -> (Self, mpsc::Receiver<Progress>) {
        let (sender, receiver) = mpsc::channel();
        (Self::new(sender), receiver)
    }
}

impl ProgressSink for ChannelProgress {
    fn report(&mut self, event: &Progress) {
        // A closed receiver only means nobody is watching anymore
        if self.sender.send(event.clone()).is_err() {
            debug!("progress receiver dropped, event discarded: {}", event);
        }
    }
}
