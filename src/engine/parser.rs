// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Command parser: decodes one command at a time from the ring.
//!
//! The parser owns the get cursor and the execution backend. It reports raw
//! [`ParseError`] codes; deciding which codes stop the session is left to
//! [`ErrorPolicy`](crate::engine::ErrorPolicy) in the processor.

use crate::buffer::RingBuffer;
use crate::errors::CommandBufferError;
use crate::observability::messages::engine::CommandFailed;
use crate::observability::messages::StructuredLog;
use crate::protocol::{CommandHeader, ParseError};
use crate::traits::{CommandArgs, CommandHandler};

/// Outcome of trying to process the next command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
    /// A command was decoded. Carries the handler's code, or the parser's own
    /// code when the header was unusable.
    Done(ParseError),
    /// `get == put`: nothing left to consume.
    Empty,
    /// The next command extends past `put`. `get` did not move.
    WouldOverrun,
}

pub struct CommandParser {
    ring: RingBuffer,
    handler: Box<dyn CommandHandler>,
    get: usize,
    put: usize,
}

impl CommandParser {
    /// Parser starting at `get`, with nothing to consume until `put` is set.
    pub fn new(
        ring: RingBuffer,
        get: usize,
        handler: Box<dyn CommandHandler>,
    ) -> Result<Self, CommandBufferError> {
        if get >= ring.entry_count() {
            return Err(CommandBufferError::InvalidOffset {
                offset: get,
                entries: ring.entry_count(),
            });
        }
        Ok(Self {
            ring,
            handler,
            get,
            put: get,
        })
    }

    /// Declares `[get, put)` as the committed range to consume.
    pub fn set_bounds(&mut self, get: usize, put: usize) {
        self.get = self.ring.wrap(get);
        self.put = self.ring.wrap(put);
    }

    pub fn set_put(&mut self, put: usize) {
        self.put = self.ring.wrap(put);
    }

    pub fn get(&self) -> usize {
        self.get
    }

    pub fn put(&self) -> usize {
        self.put
    }

    pub fn is_empty(&self) -> bool {
        self.get == self.put
    }

    pub fn entry_count(&self) -> usize {
        self.ring.entry_count()
    }

    pub fn handler_mut(&mut self) -> &mut dyn CommandHandler {
        self.handler.as_mut()
    }

    /// Decodes the command at `get` and hands it to the backend.
    ///
    /// `get` advances past the command whenever the backend ran, whatever it
    /// returned. It stays put when the header is invalid or the command is
    /// not fully committed yet.
    pub fn process_command(&mut self) -> ParseStatus {
        if self.is_empty() {
            return ParseStatus::Empty;
        }

        let get = self.get;
        let header = CommandHeader::from_entry(self.ring.entry(get));
        let size = header.size as usize;

        if size == 0 {
            return self.reject(header, ParseError::InvalidSize);
        }
        if get + size > self.ring.entry_count() {
            return self.reject(header, ParseError::OutOfBounds);
        }
        if size > self.ring.entries_between(get, self.put) {
            return ParseStatus::WouldOverrun;
        }

        let arg_count = header.arg_count();
        let args = CommandArgs::new(&self.ring, get, arg_count);
        let result = self.handler.do_command(header.command, arg_count, args);
        if result.is_error() {
            CommandFailed {
                command: header.command,
                offset: get,
                error: result,
            }
            .log();
        }

        self.get = self.ring.advance(get, size);
        ParseStatus::Done(result)
    }

    /// Processes commands until one fails, the ring is drained, or a command
    /// is only partly committed.
    pub fn process_all_commands(&mut self) -> ParseStatus {
        loop {
            match self.process_command() {
                ParseStatus::Done(ParseError::NoError) => continue,
                status => return status,
            }
        }
    }

    fn reject(&self, header: CommandHeader, error: ParseError) -> ParseStatus {
        CommandFailed {
            command: header.command,
            offset: self.get,
            error,
        }
        .log();
        ParseStatus::Done(error)
    }
}
