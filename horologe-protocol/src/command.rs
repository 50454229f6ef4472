//! Command encoding for the ESP-AT radio module.
//!
//! Every command is a single line:
//! - `AT` prefix, then the command body
//! - string arguments in double quotes, with `\`, `"` and `,` escaped by a
//!   backslash
//! - CRLF terminator

use core::fmt::Write;

use heapless::String;

/// Longest encoded command (CWJAP with a maximal, fully escaped SSID and password)
pub const MAX_COMMAND_LEN: usize = 256;

/// Errors that can occur while encoding a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Buffer too small for the encoded command
    BufferTooSmall,
}

/// Commands sent to the radio module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command<'a> {
    /// Liveness probe
    Attention,
    /// Disable command echo
    EchoOff,
    /// Station mode
    StationMode,
    /// Join an access point
    Join { ssid: &'a str, password: &'a str },
    /// Leave the current access point
    Quit,
    /// Query the station address
    QueryAddress,
    /// Enable the SNTP client
    ConfigureSntp { tz_hours: i8, server: &'a str },
    /// Query the SNTP time
    QueryTime,
}

impl Command<'_> {
    /// Whether the reply may take seconds rather than milliseconds
    pub fn is_slow(&self) -> bool {
        matches!(self, Command::Join { .. })
    }

    /// Encode this command, terminator included, into `buffer`
    ///
    /// Returns the number of bytes written. Nothing is truncated: if the
    /// command does not fit, the buffer contents are unspecified and
    /// [`CommandError::BufferTooSmall`] is returned.
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, CommandError> {
        let mut out = Cursor { buffer, len: 0 };
        out.put(b"AT")?;
        match self {
            Command::Attention => {}
            Command::EchoOff => out.put(b"E0")?,
            Command::StationMode => out.put(b"+CWMODE=1")?,
            Command::Join { ssid, password } => {
                out.put(b"+CWJAP=")?;
                out.quoted(ssid)?;
                out.put(b",")?;
                out.quoted(password)?;
            }
            Command::Quit => out.put(b"+CWQAP")?,
            Command::QueryAddress => out.put(b"+CIPSTA?")?,
            Command::ConfigureSntp { tz_hours, server } => {
                let mut tz = String::<4>::new();
                write!(tz, "{}", tz_hours).map_err(|_| CommandError::BufferTooSmall)?;
                out.put(b"+CIPSNTPCFG=1,")?;
                out.put(tz.as_bytes())?;
                out.put(b",")?;
                out.quoted(server)?;
            }
            Command::QueryTime => out.put(b"+CIPSNTPTIME?")?,
        }
        out.put(b"\r\n")?;
        Ok(out.len)
    }
}

struct Cursor<'b> {
    buffer: &'b mut [u8],
    len: usize,
}

impl Cursor<'_> {
    fn put(&mut self, bytes: &[u8]) -> Result<(), CommandError> {
        let end = self.len + bytes.len();
        let dest = self
            .buffer
            .get_mut(self.len..end)
            .ok_or(CommandError::BufferTooSmall)?;
        dest.copy_from_slice(bytes);
        self.len = end;
        Ok(())
    }

    fn quoted(&mut self, text: &str) -> Result<(), CommandError> {
        self.put(b"\"")?;
        for &byte in text.as_bytes() {
            if matches!(byte, b'\\' | b'"' | b',') {
                self.put(b"\\")?;
            }
            self.put(&[byte])?;
        }
        self.put(b"\"")
    }
}
