// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for command processing events.
//!
//! This module contains message types for logging events related to:
//! * Processing pass lifecycle (start, completion, rescheduling)
//! * Parse errors, recoverable and fatal
//! * Processor resets and scheduler shutdown

use crate::observability::messages::StructuredLog;
use crate::protocol::ParseError;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A processing pass is starting.
///
/// # Log Level
/// `debug!` - Emitted once per pass
///
/// # Example
/// ```
/// use the_ringwood::observability::messages::engine::PassStarted;
///
/// let msg = PassStarted {
///     get_offset: 0,
///     put_offset: 12,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct PassStarted {
    pub get_offset: usize,
    pub put_offset: usize,
}

impl Display for PassStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Processing commands from get={} to put={}",
            self.get_offset, self.put_offset
        )
    }
}

impl StructuredLog for PassStarted {
    fn log(&self) {
        tracing::debug!(
            get_offset = self.get_offset,
            put_offset = self.put_offset,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "pass",
            span_name = name,
            get_offset = self.get_offset,
            put_offset = self.put_offset,
        )
    }
}

/// A processing pass finished and wrote back its get offset.
///
/// # Log Level
/// `debug!` - Emitted once per pass
pub struct PassCompleted {
    pub commands_processed: usize,
    pub get_offset: usize,
    pub put_offset: usize,
    pub duration: std::time::Duration,
}

impl Display for PassCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Processed {} commands, get={} put={} in {:?}",
            self.commands_processed, self.get_offset, self.put_offset, self.duration
        )
    }
}

impl StructuredLog for PassCompleted {
    fn log(&self) {
        tracing::debug!(
            commands_processed = self.commands_processed,
            get_offset = self.get_offset,
            put_offset = self.put_offset,
            duration_us = self.duration.as_micros() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "pass_completed",
            span_name = name,
            commands_processed = self.commands_processed,
            duration = ?self.duration,
        )
    }
}

/// Commands remain after a pass; another pass was posted.
///
/// # Log Level
/// `debug!` - Normal flow control
pub struct PassRescheduled<'a> {
    pub get_offset: usize,
    pub put_offset: usize,
    pub reason: &'a str,
}

impl Display for PassRescheduled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Rescheduled processing at get={} put={}: {}",
            self.get_offset, self.put_offset, self.reason
        )
    }
}

impl StructuredLog for PassRescheduled<'_> {
    fn log(&self) {
        tracing::debug!(
            get_offset = self.get_offset,
            put_offset = self.put_offset,
            reason = self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("reschedule", span_name = name, reason = self.reason)
    }
}

/// A handler rejected a command.
///
/// # Log Level
/// `debug!` - Classification and latching happen in the processor
pub struct CommandFailed {
    pub command: u32,
    pub offset: usize,
    pub error: ParseError,
}

impl Display for CommandFailed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Command {} at offset {} failed: {}",
            self.command, self.offset, self.error
        )
    }
}

impl StructuredLog for CommandFailed {
    fn log(&self) {
        tracing::debug!(
            command = self.command,
            offset = self.offset,
            error = ?self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("command", span_name = name, command = self.command, offset = self.offset)
    }
}

/// A recoverable error was latched; processing continues.
///
/// # Log Level
/// `warn!` - Producer sent something wrong but the session survives
pub struct RecoverableParseError {
    pub error: ParseError,
    pub get_offset: usize,
}

impl Display for RecoverableParseError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Recoverable parse error before offset {}: {}",
            self.get_offset, self.error
        )
    }
}

impl StructuredLog for RecoverableParseError {
    fn log(&self) {
        tracing::warn!(error = ?self.error, get_offset = self.get_offset, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("parse_error", span_name = name, error = ?self.error)
    }
}

/// A fatal error stopped the session.
///
/// # Log Level
/// `error!` - No further commands will run until the owner resets
pub struct FatalParseError {
    pub error: ParseError,
    pub get_offset: usize,
}

impl Display for FatalParseError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Fatal parse error at offset {}: {}; command processing halted",
            self.get_offset, self.error
        )
    }
}

impl StructuredLog for FatalParseError {
    fn log(&self) {
        tracing::error!(error = ?self.error, get_offset = self.get_offset, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("parse_error", span_name = name, error = ?self.error)
    }
}

/// The handler could not make its context current; the pass was skipped.
///
/// # Log Level
/// `warn!`
pub struct ContextNotCurrent<'a> {
    pub handler: &'a str,
}

impl Display for ContextNotCurrent<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Handler '{}' could not make its context current", self.handler)
    }
}

impl StructuredLog for ContextNotCurrent<'_> {
    fn log(&self) {
        tracing::warn!(handler = self.handler, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("make_current", span_name = name, handler = self.handler)
    }
}

/// The owner reset a failed processor.
///
/// # Log Level
/// `info!`
pub struct ProcessorReset {
    pub get_offset: usize,
}

impl Display for ProcessorReset {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Processor reset, resuming at offset {}", self.get_offset)
    }
}

impl StructuredLog for ProcessorReset {
    fn log(&self) {
        tracing::info!(get_offset = self.get_offset, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("reset", span_name = name, get_offset = self.get_offset)
    }
}

/// The async scheduler loop exited.
///
/// # Log Level
/// `info!`
pub struct SchedulerStopped {
    pub tasks_run: usize,
}

impl Display for SchedulerStopped {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Command scheduler stopped after {} tasks", self.tasks_run)
    }
}

impl StructuredLog for SchedulerStopped {
    fn log(&self) {
        tracing::info!(tasks_run = self.tasks_run, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("scheduler", span_name = name, tasks_run = self.tasks_run)
    }
}
