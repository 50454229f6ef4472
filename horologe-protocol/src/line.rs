//! Line framing for radio module output.
//!
//! The module terminates lines with CRLF, but a bare CR or LF is accepted
//! as well. Blank lines carry no information and are skipped.

use heapless::Vec;

/// Longest line kept; anything longer is dropped whole
pub const MAX_LINE_LEN: usize = 128;

/// A complete line, terminator stripped
pub type Line = Vec<u8, MAX_LINE_LEN>;

/// Errors that can occur during line parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded [`MAX_LINE_LEN`]; the rest of it is being discarded
    Overflow,
}

/// Byte-at-a-time line assembler
#[derive(Debug, Clone, Default)]
pub struct LineParser {
    buffer: Line,
    discarding: bool,
}

impl LineParser {
    /// Create a new line parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }

    /// Whether a partial line is buffered
    pub fn is_idle(&self) -> bool {
        self.buffer.is_empty() && !self.discarding
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(line))` when a non-empty line is complete,
    /// `Ok(None)` when more bytes are needed, or `Err(Overflow)` once for
    /// each over-long line. After an overflow everything up to the next
    /// terminator is dropped.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Line>, LineError> {
        if byte == b'\r' || byte == b'\n' {
            if self.discarding {
                self.discarding = false;
                return Ok(None);
            }
            if self.buffer.is_empty() {
                return Ok(None);
            }
            return Ok(Some(core::mem::take(&mut self.buffer)));
        }

        if self.discarding {
            return Ok(None);
        }
        if self.buffer.push(byte).is_err() {
            self.buffer.clear();
            self.discarding = true;
            return Err(LineError::Overflow);
        }
        Ok(None)
    }
}
