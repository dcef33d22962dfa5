// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::protocol::{CommonCommand, ParseError, COMMON_COMMAND_COUNT};
use crate::traits::{CommandArgs, CommandBuffer, CommandHandler};

/// Decodes the reserved common commands and forwards everything else.
///
/// Opcodes below [`COMMON_COMMAND_COUNT`] never reach the inner handler;
/// reserved opcodes without a [`CommonCommand`] are unknown.
pub struct CommonDecoder<H> {
    command_buffer: Arc<dyn CommandBuffer>,
    inner: H,
}

impl<H: CommandHandler> CommonDecoder<H> {
    pub fn new(command_buffer: Arc<dyn CommandBuffer>, inner: H) -> Self {
        Self {
            command_buffer,
            inner,
        }
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut H {
        &mut self.inner
    }

    fn do_common_command(&mut self, command: CommonCommand, args: CommandArgs<'_>) -> ParseError {
        match command {
            CommonCommand::Noop => ParseError::NoError,
            CommonCommand::SetToken => match (args.len(), args.get(0)) {
                (1, Some(token)) => {
                    self.command_buffer.set_token(token as i32);
                    ParseError::NoError
                }
                _ => ParseError::InvalidArguments,
            },
        }
    }
}

impl<H: CommandHandler> CommandHandler for CommonDecoder<H> {
    fn do_command(&mut self, command: u32, arg_count: usize, args: CommandArgs<'_>) -> ParseError {
        if command >= COMMON_COMMAND_COUNT {
            return self.inner.do_command(command, arg_count, args);
        }
        match CommonCommand::from_opcode(command) {
            Some(common) => self.do_common_command(common, args),
            None => ParseError::UnknownCommand,
        }
    }

    fn make_current(&mut self) -> bool {
        self.inner.make_current()
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
