// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while setting up or feeding a command buffer.
//!
//! These cover the owner and producer side only: sizing a shared region,
//! building a ring view over it, writing commands into it. Failures of the
//! commands themselves never become Rust errors; they are reported through
//! [`ParseError`](crate::protocol::ParseError) codes on the shared state.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandBufferError {
    /// A region or ring was requested with no entries.
    #[error("Command buffer capacity must be at least one entry")]
    ZeroCapacity,

    /// Byte size is not a whole number of entries.
    #[error("Region size {size} is not a multiple of the {stride}-byte entry stride")]
    MisalignedSize { size: usize, stride: usize },

    /// The ring would extend past the end of its backing region.
    #[error("Ring of {entries} entries does not fit in a region of {region_entries} entries")]
    RingExceedsRegion {
        entries: usize,
        region_entries: usize,
    },

    /// The starting offset is not inside the ring.
    #[error("Offset {offset} is outside a ring of {entries} entries")]
    InvalidOffset { offset: usize, entries: usize },

    /// The command can never fit, even in an empty ring.
    #[error("Command of {size} entries cannot fit in a ring of {entries} entries")]
    CommandTooLarge { size: usize, entries: usize },

    /// The opcode does not fit in the header's command field.
    #[error("Opcode {0} does not fit in the command header")]
    InvalidOpcode(u32),

    /// Not enough entries have been consumed yet to hold the command.
    #[error("Ring buffer full: need {needed} entries, {available} available")]
    RingFull { needed: usize, available: usize },

    /// No free transfer buffer id remains.
    #[error("No transfer buffer ids left")]
    TransferBufferIdsExhausted,
}
