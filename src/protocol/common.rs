// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Opcodes below this value are reserved for [`CommonCommand`]s.
pub const COMMON_COMMAND_COUNT: u32 = 16;

/// Commands understood by every decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum CommonCommand {
    /// Skips its arguments. Producers use it to pad the end of the ring.
    Noop = 0,
    /// One argument: the token to publish on the shared state.
    SetToken = 1,
}

impl CommonCommand {
    pub fn opcode(self) -> u32 {
        self as u32
    }

    pub fn from_opcode(opcode: u32) -> Option<Self> {
        match opcode {
            0 => Some(CommonCommand::Noop),
            1 => Some(CommonCommand::SetToken),
            _ => None,
        }
    }
}
