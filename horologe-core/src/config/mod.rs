//! Configuration
//!
//! Board-agnostic configuration structures and the TOML-subset parser
//! that fills them.

pub mod parse;
pub mod types;

pub use parse::{parse_config, ParseError};
pub use types::*;
