// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

const SIZE_BITS: u32 = 21;
const SIZE_MASK: u32 = (1 << SIZE_BITS) - 1;

/// Largest command, in entries, including its header.
pub const MAX_COMMAND_SIZE: usize = SIZE_MASK as usize;
/// Largest opcode that fits in a header.
pub const MAX_COMMAND_ID: u32 = (1 << (32 - SIZE_BITS)) - 1;

/// First entry of every command.
///
/// `size` counts the whole command in entries, header included, so a command
/// with no arguments has `size == 1`. A header with `size == 0` is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandHeader {
    pub size: u32,
    pub command: u32,
}

impl CommandHeader {
    /// Header for `command` followed by `arg_count` argument entries.
    ///
    /// Returns `None` when the opcode or the size does not fit its field.
    pub fn new(command: u32, arg_count: usize) -> Option<Self> {
        let size = arg_count.checked_add(1)?;
        if command > MAX_COMMAND_ID || size > MAX_COMMAND_SIZE {
            return None;
        }
        Some(Self {
            size: size as u32,
            command,
        })
    }

    pub fn from_entry(entry: u32) -> Self {
        Self {
            size: entry & SIZE_MASK,
            command: entry >> SIZE_BITS,
        }
    }

    pub fn to_entry(self) -> u32 {
        (self.command << SIZE_BITS) | (self.size & SIZE_MASK)
    }

    /// Number of argument entries following the header.
    pub fn arg_count(self) -> usize {
        (self.size as usize).saturating_sub(1)
    }
}
