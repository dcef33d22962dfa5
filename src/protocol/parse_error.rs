// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of decoding and executing one command.
///
/// These are wire values: they are latched in the shared state as `u32` and
/// read back by the producer, possibly from another process. Whether a code
/// halts processing is decided by [`ErrorPolicy`](crate::engine::ErrorPolicy),
/// not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum ParseError {
    #[default]
    NoError = 0,
    /// Header declares a size of zero.
    InvalidSize = 1,
    /// Command or offset reaches outside the memory it refers to.
    OutOfBounds = 2,
    /// The handler does not know the opcode.
    UnknownCommand = 3,
    /// The handler rejected the arguments.
    InvalidArguments = 4,
}

impl ParseError {
    pub fn is_error(self) -> bool {
        self != ParseError::NoError
    }

    /// Decodes a latched value. Unknown values map to `None`.
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(ParseError::NoError),
            1 => Some(ParseError::InvalidSize),
            2 => Some(ParseError::OutOfBounds),
            3 => Some(ParseError::UnknownCommand),
            4 => Some(ParseError::InvalidArguments),
            _ => None,
        }
    }
}

impl From<ParseError> for u32 {
    fn from(error: ParseError) -> Self {
        error as u32
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ParseError::NoError => "no error",
            ParseError::InvalidSize => "invalid command size",
            ParseError::OutOfBounds => "out of bounds",
            ParseError::UnknownCommand => "unknown command",
            ParseError::InvalidArguments => "invalid arguments",
        };
        f.write_str(text)
    }
}
