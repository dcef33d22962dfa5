// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::protocol::ParseError;
use crate::traits::{CommandArgs, CommandHandler};

/// Accepts every command and logs it at debug level.
#[derive(Debug, Default)]
pub struct TracingDecoder {
    commands_seen: usize,
}

impl TracingDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands_seen(&self) -> usize {
        self.commands_seen
    }
}

impl CommandHandler for TracingDecoder {
    fn do_command(&mut self, command: u32, arg_count: usize, args: CommandArgs<'_>) -> ParseError {
        self.commands_seen += 1;
        tracing::debug!(
            command,
            arg_count,
            offset = args.offset(),
            args = ?args.to_vec(),
            "Decoded command"
        );
        ParseError::NoError
    }

    fn name(&self) -> &'static str {
        "tracing"
    }
}
