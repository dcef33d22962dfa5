// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::buffer::SharedMemory;
use crate::protocol::{ParseError, COMMON_COMMAND_COUNT, ENTRY_SIZE};
use crate::traits::{CommandArgs, CommandBuffer, CommandHandler};

/// Opcodes understood by [`AccumulatorDecoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum AccumulatorCommand {
    /// `[value]`: adds the sign-extended value.
    Add = COMMON_COMMAND_COUNT,
    /// `[value]`: multiplies by the sign-extended value.
    Multiply,
    /// `[]`: resets the accumulator to 0.
    Clear,
    /// `[shm_id, shm_offset]`: writes the low 32 bits into a transfer buffer.
    StoreResult,
    /// `[shm_id, shm_offset]`: replaces the accumulator with a word read from
    /// a transfer buffer.
    LoadValue,
}

impl AccumulatorCommand {
    pub fn opcode(self) -> u32 {
        self as u32
    }

    pub fn from_opcode(opcode: u32) -> Option<Self> {
        use AccumulatorCommand::*;
        [Add, Multiply, Clear, StoreResult, LoadValue]
            .into_iter()
            .find(|command| command.opcode() == opcode)
    }

    fn arg_count(self) -> usize {
        match self {
            AccumulatorCommand::Clear => 0,
            AccumulatorCommand::Add | AccumulatorCommand::Multiply => 1,
            AccumulatorCommand::StoreResult | AccumulatorCommand::LoadValue => 2,
        }
    }
}

/// Integer accumulator backend.
///
/// Arithmetic wraps. Transfer buffer offsets are in bytes and must be
/// word-aligned; a missing buffer or an offset past its end is
/// `OutOfBounds`.
pub struct AccumulatorDecoder {
    command_buffer: Arc<dyn CommandBuffer>,
    value: i64,
}

impl AccumulatorDecoder {
    pub fn new(command_buffer: Arc<dyn CommandBuffer>) -> Self {
        Self {
            command_buffer,
            value: 0,
        }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    fn store(&self, shm_id: u32, shm_offset: u32) -> ParseError {
        match self.transfer_word(shm_id, shm_offset) {
            Some((memory, index)) if memory.set(index, self.value as u32) => ParseError::NoError,
            _ => ParseError::OutOfBounds,
        }
    }

    fn load(&mut self, shm_id: u32, shm_offset: u32) -> ParseError {
        match self
            .transfer_word(shm_id, shm_offset)
            .and_then(|(memory, index)| memory.get(index))
        {
            Some(word) => {
                self.value = i64::from(word as i32);
                ParseError::NoError
            }
            None => ParseError::OutOfBounds,
        }
    }

    fn transfer_word(&self, shm_id: u32, shm_offset: u32) -> Option<(SharedMemory, usize)> {
        let offset = shm_offset as usize;
        if offset % ENTRY_SIZE != 0 {
            return None;
        }
        let buffer = self.command_buffer.get_transfer_buffer(shm_id);
        if offset + ENTRY_SIZE > buffer.size {
            return None;
        }
        buffer.memory.map(|memory| (memory, offset / ENTRY_SIZE))
    }
}

impl CommandHandler for AccumulatorDecoder {
    fn do_command(&mut self, command: u32, arg_count: usize, args: CommandArgs<'_>) -> ParseError {
        let Some(command) = AccumulatorCommand::from_opcode(command) else {
            return ParseError::UnknownCommand;
        };
        if arg_count != command.arg_count() {
            return ParseError::InvalidArguments;
        }

        let arg = |index: usize| args.get(index).unwrap_or_default();
        match command {
            AccumulatorCommand::Add => {
                self.value = self.value.wrapping_add(i64::from(arg(0) as i32));
            }
            AccumulatorCommand::Multiply => {
                self.value = self.value.wrapping_mul(i64::from(arg(0) as i32));
            }
            AccumulatorCommand::Clear => self.value = 0,
            AccumulatorCommand::StoreResult => return self.store(arg(0), arg(1)),
            AccumulatorCommand::LoadValue => return self.load(arg(0), arg(1)),
        }
        ParseError::NoError
    }

    fn name(&self) -> &'static str {
        "accumulator"
    }
}
