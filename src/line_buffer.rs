use heapless::Vec;

use crate::config::LINE_CAPACITY;

pub type Line = Vec<u8, LINE_CAPACITY>;

/// Result of feeding one byte to a [`LineBuffer`].
#[derive(Debug, PartialEq, Eq)]
pub enum LineEvent {
    /// Byte stored, no terminator yet.
    Pending,
    /// Terminator with nothing accumulated.
    Empty,
    /// Terminator after content. The buffer is reset.
    Line(Line),
    /// The line hit `LINE_CAPACITY - 1` bytes without a terminator; its
    /// content was discarded and the rest of the line will be too.
    Overflow,
    /// Byte or terminator belonging to an overflowed line.
    Discarded,
}

/// Accumulates serial bytes into `\n` or `\r` terminated lines.
///
/// After an overflow every byte is dropped until the next terminator or an
/// explicit [`LineBuffer::resync`], so the tail of an overlong line is never
/// decoded as a command of its own.
#[derive(Debug, Default)]
pub struct LineBuffer {
    bytes: Line,
    discarding: bool,
}

impl LineBuffer {
    pub const fn new() -> Self {
        Self {
            bytes: Vec::new(),
            discarding: false,
        }
    }

    pub fn push(&mut self, byte: u8) -> LineEvent {
        if byte == b'\n' || byte == b'\r' {
            if self.discarding {
                self.discarding = false;
                return LineEvent::Discarded;
            }
            if self.bytes.is_empty() {
                return LineEvent::Empty;
            }
            return LineEvent::Line(core::mem::take(&mut self.bytes));
        }

        if self.discarding {
            return LineEvent::Discarded;
        }
        if self.bytes.len() >= LINE_CAPACITY - 2 {
            self.bytes.clear();
            self.discarding = true;
            return LineEvent::Overflow;
        }
        let pushed = self.bytes.push(byte);
        debug_assert!(pushed.is_ok());
        LineEvent::Pending
    }

    /// Ends discarding of an overflowed line, e.g. once the input goes quiet.
    pub fn resync(&mut self) {
        self.discarding = false;
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// True when the buffer is in its initial state.
    pub fn is_fresh(&self) -> bool {
        self.bytes.is_empty() && !self.discarding
    }
}
