// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Messages are organized by subsystem:
//!
//! * `engine` - parser, processor and scheduler events
//! * `buffer` - shared state, transfer buffer and producer events

use tracing::Span;

pub mod buffer;
pub mod engine;

/// A message that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emits the message as a `tracing` event.
    fn log(&self);

    /// Builds a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
