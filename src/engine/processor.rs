// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Command processor: drains the ring and reports progress through the
//! shared counters.
//!
//! # Processing pass
//!
//! ```text
//! process_commands()
//!   ├─ fatal?                  → return, nothing read
//!   ├─ read put, bound parser
//!   ├─ loop (≤ commands_per_update)
//!   │    ├─ Empty / WouldOverrun → stop
//!   │    ├─ NoError              → next
//!   │    ├─ recoverable          → latch code, next
//!   │    └─ fatal                → write get, latch, raise status, return
//!   ├─ write get
//!   └─ get != put?             → post ProcessCommands to the scheduler
//! ```
//!
//! The processor never waits for the producer. Work it cannot finish in one
//! pass, because the budget ran out or the next command is only partly
//! committed, is finished by a follow-up pass posted to the
//! [`CommandScheduler`](crate::engine::CommandScheduler).

use std::sync::Arc;
use std::time::Instant;

use crate::buffer::Buffer;
use crate::engine::parser::{CommandParser, ParseStatus};
use crate::engine::policy::{ErrorClass, ErrorPolicy};
use crate::engine::scheduler::{ScheduledTask, SchedulerHandle};
use crate::errors::CommandBufferError;
use crate::observability::messages::engine::{
    ContextNotCurrent, FatalParseError, PassCompleted, PassRescheduled, PassStarted,
    ProcessorReset, RecoverableParseError,
};
use crate::observability::messages::StructuredLog;
use crate::protocol::ParseError;
use crate::traits::CommandBuffer;

/// Where the processor is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorState {
    /// The last pass drained everything it could without errors.
    Idle,
    /// A pass is running.
    Draining,
    /// The last pass latched at least one recoverable error.
    ErrorLatched,
    /// A fatal error was raised. Nothing runs until [`CommandProcessor::reset`].
    Fatal,
}

pub struct CommandProcessor {
    command_buffer: Arc<dyn CommandBuffer>,
    parser: CommandParser,
    policy: ErrorPolicy,
    commands_per_update: usize,
    scheduler: SchedulerHandle,
    state: ProcessorState,
}

impl CommandProcessor {
    /// `commands_per_update` bounds the commands run per pass; it is clamped
    /// to at least 1.
    pub fn new(
        command_buffer: Arc<dyn CommandBuffer>,
        parser: CommandParser,
        commands_per_update: usize,
        scheduler: SchedulerHandle,
    ) -> Self {
        Self {
            command_buffer,
            parser,
            policy: ErrorPolicy::default(),
            commands_per_update: commands_per_update.max(1),
            scheduler,
            state: ProcessorState::Idle,
        }
    }

    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn state(&self) -> ProcessorState {
        self.state
    }

    pub fn get_offset(&self) -> usize {
        self.parser.get()
    }

    pub fn scheduler_handle(&self) -> &SchedulerHandle {
        &self.scheduler
    }

    /// Runs one processing pass and returns the resulting state.
    pub fn process_commands(&mut self) -> ProcessorState {
        if self.state == ProcessorState::Fatal || self.command_buffer.get_error_status() {
            self.state = ProcessorState::Fatal;
            return self.state;
        }

        let handler = self.parser.handler_mut();
        if !handler.make_current() {
            ContextNotCurrent {
                handler: handler.name(),
            }
            .log();
            return self.state;
        }

        let put = self.command_buffer.get_put_offset() as usize;
        if put >= self.parser.entry_count() {
            self.fail(ParseError::OutOfBounds);
            return self.state;
        }
        self.parser.set_put(put);

        let started = Instant::now();
        let pass = PassStarted {
            get_offset: self.parser.get(),
            put_offset: put,
        };
        let _span = pass.span("process_commands").entered();
        pass.log();

        self.state = ProcessorState::Draining;
        let mut latched = false;
        let mut commands_processed = 0;
        let mut overrun = false;

        while commands_processed < self.commands_per_update {
            match self.parser.process_command() {
                ParseStatus::Empty => break,
                ParseStatus::WouldOverrun => {
                    overrun = true;
                    break;
                }
                ParseStatus::Done(error) => match self.policy.classify(error) {
                    ErrorClass::NoError => {}
                    ErrorClass::Recoverable => {
                        RecoverableParseError {
                            error,
                            get_offset: self.parser.get(),
                        }
                        .log();
                        self.command_buffer.set_parse_error(error);
                        latched = true;
                    }
                    ErrorClass::Fatal => {
                        self.fail(error);
                        return self.state;
                    }
                },
            }
            commands_processed += 1;
        }

        let get = self.parser.get();
        self.command_buffer.set_get_offset(get as u32);
        self.state = if latched {
            ProcessorState::ErrorLatched
        } else {
            ProcessorState::Idle
        };

        PassCompleted {
            commands_processed,
            get_offset: get,
            put_offset: put,
            duration: started.elapsed(),
        }
        .log();

        if !self.parser.is_empty() {
            PassRescheduled {
                get_offset: get,
                put_offset: put,
                reason: if overrun {
                    "next command extends past put"
                } else {
                    "command budget used up"
                },
            }
            .log();
            self.scheduler.post(ScheduledTask::ProcessCommands);
        }

        self.state
    }

    /// Region registered under `id`, empty if there is none.
    pub fn get_shared_memory_buffer(&self, id: u32) -> Buffer {
        self.command_buffer.get_transfer_buffer(id)
    }

    pub fn set_token(&self, token: i32) {
        self.command_buffer.set_token(token);
    }

    /// Returns a failed processor to `Idle`, resuming at `get_offset`.
    ///
    /// The owner clears the shared error status itself; while it stays
    /// raised the next pass goes straight back to `Fatal`.
    pub fn reset(&mut self, get_offset: usize) -> Result<(), CommandBufferError> {
        let entries = self.parser.entry_count();
        if get_offset >= entries {
            return Err(CommandBufferError::InvalidOffset {
                offset: get_offset,
                entries,
            });
        }
        self.parser.set_bounds(get_offset, get_offset);
        self.command_buffer.set_get_offset(get_offset as u32);
        self.state = ProcessorState::Idle;
        ProcessorReset { get_offset }.log();
        Ok(())
    }

    fn fail(&mut self, error: ParseError) {
        let get = self.parser.get();
        self.command_buffer.set_get_offset(get as u32);
        self.command_buffer.set_parse_error(error);
        self.command_buffer.raise_error_status();
        self.state = ProcessorState::Fatal;
        FatalParseError {
            error,
            get_offset: get,
        }
        .log();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::RecordingHandler;
    use crate::buffer::{SharedCommandBuffer, SharedMemory};
    use crate::engine::scheduler::task_queue;

    fn processor(handler: RecordingHandler) -> (Arc<SharedCommandBuffer>, CommandProcessor) {
        let command_buffer = Arc::new(SharedCommandBuffer::with_size(64).unwrap());
        let parser =
            CommandParser::new(command_buffer.ring_buffer(), 0, Box::new(handler)).unwrap();
        let (handle, _queue) = task_queue();
        let processor = CommandProcessor::new(command_buffer.clone(), parser, 100, handle);
        (command_buffer, processor)
    }

    #[test]
    fn test_skips_pass_when_context_is_lost() {
        let handler = RecordingHandler::new().with_make_current(false);
        let make_current_calls = handler.make_current_calls();
        let (command_buffer, mut processor) = processor(handler);
        command_buffer.flush(3);

        assert_eq!(processor.process_commands(), ProcessorState::Idle);
        assert_eq!(make_current_calls.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(processor.get_offset(), 0);
    }

    #[test]
    fn test_put_outside_ring_is_fatal() {
        let (command_buffer, mut processor) = processor(RecordingHandler::new());
        command_buffer.flush(16);

        assert_eq!(processor.process_commands(), ProcessorState::Fatal);
        let state = command_buffer.get_state();
        assert!(state.error_status);
        assert_eq!(state.error, ParseError::OutOfBounds);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let (command_buffer, mut processor) = processor(RecordingHandler::new());
        command_buffer.flush(16);
        processor.process_commands();

        command_buffer.clear_error_status();
        assert_eq!(command_buffer.reset_parse_error(), ParseError::OutOfBounds);
        command_buffer.flush(4);
        processor.reset(4).unwrap();

        assert_eq!(processor.state(), ProcessorState::Idle);
        assert_eq!(command_buffer.get_state().get_offset, 4);
        assert_eq!(processor.process_commands(), ProcessorState::Idle);
        assert!(processor.reset(16).is_err());
    }

    #[test]
    fn test_shared_memory_lookup_delegates() {
        let (command_buffer, processor) = processor(RecordingHandler::new());
        let memory = SharedMemory::new(32).unwrap();
        command_buffer.register_transfer_buffer(5, memory.clone());

        let buffer = processor.get_shared_memory_buffer(5);
        assert_eq!(buffer.ptr(), memory.as_ptr());
        assert_eq!(buffer.size, 32);
        assert!(processor.get_shared_memory_buffer(6).is_empty());
    }
}
