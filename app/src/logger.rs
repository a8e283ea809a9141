use std::fmt;

use crossbeam::channel::{Receiver, Sender, unbounded};
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

/// A log record captured on any thread, waiting to be printed by the frame loop.
#[derive(Debug)]
pub struct LogMessage {
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl fmt::Display for LogMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<5} {}: {}", self.level, self.target, self.message)
    }
}

/// A [`log::Log`] that forwards records over a channel instead of writing them out.
pub struct ChannelLogger {
    sender: Sender<LogMessage>,
    level: LevelFilter,
}

impl log::Log for ChannelLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let _ = self.sender.try_send(LogMessage {
                level: record.level(),
                target: record.target().to_string(),
                message: format!("{}", record.args()),
            });
        }
    }

    fn flush(&self) {}
}

impl ChannelLogger {
    pub fn new(sender: Sender<LogMessage>, level: LevelFilter) -> Self {
        Self { sender, level }
    }

    pub fn with_receiver(level: LevelFilter) -> (Self, Receiver<LogMessage>) {
        let (sender, receiver) = unbounded();
        (Self::new(sender, level), receiver)
    }

    /// Install a channel logger as the global logger, returning the receiving end.
    pub fn install(level: LevelFilter) -> Result<Receiver<LogMessage>, SetLoggerError> {
        let (logger, receiver) = Self::with_receiver(level);
        log::set_boxed_logger(Box::new(logger))?;
        log::set_max_level(level);
        Ok(receiver)
    }
}
