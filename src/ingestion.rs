use core::task::Poll;

use embassy_futures::poll_once;
use embassy_time::{with_timeout, Timer};
use embedded_io_async::Read;
use portable_atomic::{AtomicU32, Ordering};

use crate::command::Command;
use crate::config::{COMMAND_SEND_TIMEOUT, LINE_CAPACITY, SERIAL_READ_TIMEOUT};
use crate::line_buffer::{LineBuffer, LineEvent};
use crate::log::*;
use crate::CommandSender;

/// Byte source feeding the command ingestion task.
pub trait SerialTransport: Read {
    /// Drops input that has already been received but not yet read.
    fn discard_pending(&mut self) -> Result<(), Self::Error> {
        let mut scratch = [0u8; 16];
        loop {
            match poll_once(self.read(&mut scratch)) {
                Poll::Ready(Ok(n)) if n > 0 => continue,
                Poll::Ready(Err(e)) => return Err(e),
                _ => return Ok(()),
            }
        }
    }
}

/// Counters for everything the ingestion task decodes or throws away.
#[derive(Debug, Default)]
pub struct IngestionStats {
    decoded: AtomicU32,
    unknown: AtomicU32,
    dropped: AtomicU32,
    overflowed: AtomicU32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionCounts {
    pub decoded: u32,
    pub unknown: u32,
    pub dropped: u32,
    pub overflowed: u32,
}

impl IngestionStats {
    pub const fn new() -> Self {
        Self {
            decoded: AtomicU32::new(0),
            unknown: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
            overflowed: AtomicU32::new(0),
        }
    }

    pub fn counts(&self) -> IngestionCounts {
        IngestionCounts {
            decoded: self.decoded.load(Ordering::Relaxed),
            unknown: self.unknown.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            overflowed: self.overflowed.load(Ordering::Relaxed),
        }
    }

    fn bump(counter: &AtomicU32) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// What a single ingestion iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ingested {
    /// No byte arrived within the read timeout.
    Idle,
    ReadFailed,
    Pending,
    EmptyLine,
    Queued(Command),
    Unknown,
    /// Decoded, but the channel stayed full past the send timeout.
    Dropped(Command),
    Overflow,
    /// Byte from the remainder of an overlong line.
    Discarded,
}

pub struct CommandIngestor<'a, T: SerialTransport> {
    transport: T,
    line: LineBuffer,
    commands: CommandSender<'a>,
    stats: &'a IngestionStats,
}

impl<'a, T: SerialTransport> CommandIngestor<'a, T> {
    pub fn new(transport: T, commands: CommandSender<'a>, stats: &'a IngestionStats) -> Self {
        Self {
            transport,
            line: LineBuffer::new(),
            commands,
            stats,
        }
    }

    pub async fn run(&mut self) -> ! {
        info!("Starting command ingestion");
        loop {
            self.poll_once().await;
        }
    }

    /// Reads at most one byte and processes it.
    pub async fn poll_once(&mut self) -> Ingested {
        let mut byte = [0u8; 1];
        match with_timeout(SERIAL_READ_TIMEOUT, self.transport.read(&mut byte)).await {
            Err(_) => {
                // The line went quiet, so any overlong line has ended.
                self.line.resync();
                return Ingested::Idle;
            }
            // A closed or failing port completes reads at once; back off so
            // the loop still yields to other tasks.
            Ok(Ok(0)) => {
                self.line.resync();
                Timer::after(SERIAL_READ_TIMEOUT).await;
                return Ingested::Idle;
            }
            Ok(Err(_)) => {
                warn!("Serial read failed");
                Timer::after(SERIAL_READ_TIMEOUT).await;
                return Ingested::ReadFailed;
            }
            Ok(Ok(_)) => {}
        }

        match self.line.push(byte[0]) {
            LineEvent::Pending => Ingested::Pending,
            LineEvent::Empty => Ingested::EmptyLine,
            LineEvent::Overflow => {
                self.discard_pending();
                IngestionStats::bump(&self.stats.overflowed);
                warn!(
                    "Command line longer than {} bytes, discarded",
                    LINE_CAPACITY - 2
                );
                Ingested::Overflow
            }
            LineEvent::Discarded => Ingested::Discarded,
            LineEvent::Line(line) => {
                self.discard_pending();
                self.dispatch(&line).await
            }
        }
    }

    async fn dispatch(&mut self, line: &[u8]) -> Ingested {
        let command = match Command::from_line(line) {
            Ok(command) => command,
            Err(_) => {
                IngestionStats::bump(&self.stats.unknown);
                warn!(
                    "Unknown command: {}",
                    core::str::from_utf8(line).unwrap_or("<non-utf8>")
                );
                return Ingested::Unknown;
            }
        };
        IngestionStats::bump(&self.stats.decoded);

        match with_timeout(COMMAND_SEND_TIMEOUT, self.commands.send(command)).await {
            Ok(()) => {
                debug!("Queued command: {}", command.as_str());
                Ingested::Queued(command)
            }
            Err(_) => {
                IngestionStats::bump(&self.stats.dropped);
                error!("Failed to send command: {}", command.as_str());
                Ingested::Dropped(command)
            }
        }
    }

    fn discard_pending(&mut self) {
        if self.transport.discard_pending().is_err() {
            warn!("Failed to discard pending serial input");
        }
    }

    #[cfg(test)]
    fn transport(&self) -> &T {
        &self.transport
    }

    #[cfg(test)]
    fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    #[cfg(test)]
    fn line_is_fresh(&self) -> bool {
        self.line.is_fresh()
    }
}
