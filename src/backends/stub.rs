// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::protocol::ParseError;
use crate::traits::{CommandArgs, CommandHandler};

/// One command as seen by [`RecordingHandler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub command: u32,
    pub arg_count: usize,
    /// Offset of the command's header word.
    pub offset: usize,
    pub args: Vec<u32>,
}

/// A handler that records every command and returns scripted codes.
///
/// Commands without a scripted code succeed.
pub struct RecordingHandler {
    calls: Arc<Mutex<Vec<Call>>>,
    failures: HashMap<u32, ParseError>,
    make_current: bool,
    make_current_calls: Arc<AtomicUsize>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            failures: HashMap::new(),
            make_current: true,
            make_current_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns `error` whenever `command` is decoded.
    pub fn fail_on(mut self, command: u32, error: ParseError) -> Self {
        self.failures.insert(command, error);
        self
    }

    pub fn with_make_current(mut self, make_current: bool) -> Self {
        self.make_current = make_current;
        self
    }

    /// Shared log of received commands, readable after the handler is boxed.
    pub fn calls(&self) -> Arc<Mutex<Vec<Call>>> {
        self.calls.clone()
    }

    pub fn make_current_calls(&self) -> Arc<AtomicUsize> {
        self.make_current_calls.clone()
    }
}

impl Default for RecordingHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHandler for RecordingHandler {
    fn do_command(&mut self, command: u32, arg_count: usize, args: CommandArgs<'_>) -> ParseError {
        self.calls.lock().unwrap().push(Call {
            command,
            arg_count,
            offset: args.offset(),
            args: args.to_vec(),
        });
        self.failures
            .get(&command)
            .copied()
            .unwrap_or(ParseError::NoError)
    }

    fn make_current(&mut self) -> bool {
        self.make_current_calls.fetch_add(1, Ordering::SeqCst);
        self.make_current
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
