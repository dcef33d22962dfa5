// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for shared command-buffer state.
//!
//! This module contains message types for logging events related to:
//! * Transfer buffer registration
//! * Producer put-offset publication
//! * Owner-side error resets

use crate::observability::messages::StructuredLog;
use crate::protocol::ParseError;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A transfer buffer was registered.
///
/// # Log Level
/// `debug!` - Owner bookkeeping
pub struct TransferBufferRegistered {
    pub id: u32,
    pub size: usize,
}

impl Display for TransferBufferRegistered {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Registered transfer buffer {} ({} bytes)", self.id, self.size)
    }
}

impl StructuredLog for TransferBufferRegistered {
    fn log(&self) {
        tracing::debug!(id = self.id, size = self.size, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("transfer_buffer", span_name = name, id = self.id, size = self.size)
    }
}

/// A transfer buffer id was unregistered.
///
/// # Log Level
/// `debug!` when found, `warn!` for unknown ids
pub struct TransferBufferUnregistered {
    pub id: u32,
    pub found: bool,
}

impl Display for TransferBufferUnregistered {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.found {
            write!(f, "Unregistered transfer buffer {}", self.id)
        } else {
            write!(f, "Unregister of unknown transfer buffer {}", self.id)
        }
    }
}

impl StructuredLog for TransferBufferUnregistered {
    fn log(&self) {
        if self.found {
            tracing::debug!(id = self.id, "{}", self);
        } else {
            tracing::warn!(id = self.id, "{}", self);
        }
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("transfer_buffer", span_name = name, id = self.id, found = self.found)
    }
}

/// The producer made new commands visible.
///
/// # Log Level
/// `trace!` - Emitted on every flush
pub struct PutOffsetPublished {
    pub put_offset: u32,
}

impl Display for PutOffsetPublished {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Producer published put offset {}", self.put_offset)
    }
}

impl StructuredLog for PutOffsetPublished {
    fn log(&self) {
        tracing::trace!(put_offset = self.put_offset, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!("flush", span_name = name, put_offset = self.put_offset)
    }
}

/// The owner cleared the fatal error status.
///
/// # Log Level
/// `info!` - Session recovery
pub struct ErrorStatusCleared {
    pub latched_error: ParseError,
}

impl Display for ErrorStatusCleared {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Error status cleared (latched error: {})",
            self.latched_error
        )
    }
}

impl StructuredLog for ErrorStatusCleared {
    fn log(&self) {
        tracing::info!(latched_error = ?self.latched_error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("error_status", span_name = name, latched_error = ?self.latched_error)
    }
}
