// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Wire format shared by producers and the command processor.
//!
//! The ring is an array of 32-bit entries. Every command starts with a
//! [`CommandHeader`] entry and is followed by `size - 1` argument entries:
//!
//! ```text
//!  31          21 20                    0
//! +--------------+-----------------------+
//! |   command    |         size          |   header entry
//! +--------------+-----------------------+
//! |            argument 0                |
//! |               ...                    |
//! |         argument size - 2            |
//! +--------------------------------------+
//! ```
//!
//! Commands are packed back to back and never wrap around the end of the ring.

mod common;
mod header;
mod parse_error;

pub use common::{CommonCommand, COMMON_COMMAND_COUNT};
pub use header::{CommandHeader, MAX_COMMAND_ID, MAX_COMMAND_SIZE};
pub use parse_error::ParseError;

/// Size in bytes of one ring entry.
pub const ENTRY_SIZE: usize = std::mem::size_of::<u32>();
