// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashSet;

use crate::protocol::ParseError;

/// How the processor reacts to a command's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Keep going.
    NoError,
    /// Latch the code and keep going.
    Recoverable,
    /// Latch the code, raise the error status, stop the session.
    Fatal,
}

/// Partition of parse errors into recoverable and fatal.
///
/// Any error not listed as recoverable is fatal. By default only unknown
/// commands and invalid arguments are recoverable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPolicy {
    recoverable: HashSet<ParseError>,
}

impl ErrorPolicy {
    /// `NoError` is ignored if listed.
    pub fn new<I>(recoverable: I) -> Self
    where
        I: IntoIterator<Item = ParseError>,
    {
        Self {
            recoverable: recoverable
                .into_iter()
                .filter(|error| error.is_error())
                .collect(),
        }
    }

    pub fn classify(&self, error: ParseError) -> ErrorClass {
        if !error.is_error() {
            ErrorClass::NoError
        } else if self.recoverable.contains(&error) {
            ErrorClass::Recoverable
        } else {
            ErrorClass::Fatal
        }
    }
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        Self::new([ParseError::UnknownCommand, ParseError::InvalidArguments])
    }
}
