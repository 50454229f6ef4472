//! Radio Co-processor Protocol
//!
//! This crate defines the UART protocol between the RP2040 and an ESP-AT
//! radio module. The module owns the WiFi association and the SNTP client;
//! the RP2040 only issues commands and reacts to what comes back.
//!
//! # Protocol Overview
//!
//! Traffic is line oriented, 115200 8N1, every line terminated by CRLF:
//! ```text
//! RP2040 ──▶ AT+CWJAP="ssid","password"\r\n
//! RP2040 ◀── WIFI CONNECTED\r\n
//! RP2040 ◀── WIFI GOT IP\r\n
//! RP2040 ◀── OK\r\n
//! ```
//!
//! Only one command is outstanding at a time. Its reply ends with a final
//! line (`OK`, `ERROR` or `FAIL`). Unsolicited lines such as
//! `WIFI DISCONNECT` can arrive at any moment, interleaved with replies.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod line;
pub mod response;

pub use command::{Command, CommandError, MAX_COMMAND_LEN};
pub use line::{Line, LineError, LineParser, MAX_LINE_LEN};
pub use response::{JoinFailure, Response, MIN_VALID_YEAR};
