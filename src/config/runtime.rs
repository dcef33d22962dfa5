// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::backends::local::LocalHandlerFactory;
use crate::buffer::SharedCommandBuffer;
use crate::config::EngineConfig;
use crate::engine::{
    task_queue, CommandParser, CommandProcessor, CommandScheduler, ErrorPolicy, ScheduledTask,
};
use crate::errors::{CommandBufferError, ConfigError};
use crate::traits::CommandBuffer;

/// Session builder - wires the shared buffer, backend, processor and
/// scheduler together from configuration.
///
/// # Examples
///
/// ```
/// use the_ringwood::buffer::CommandWriter;
/// use the_ringwood::config::{EngineConfig, RuntimeBuilder};
///
/// let (command_buffer, mut scheduler) = RuntimeBuilder::from_config(&EngineConfig::default())?;
///
/// let mut writer = CommandWriter::new(command_buffer.clone());
/// let token = writer.insert_token()?;
/// writer.flush();
///
/// scheduler.run_pending();
/// assert!(writer.has_token_passed(token));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build a complete session from configuration.
    ///
    /// Every [`flush`](SharedCommandBuffer::flush) on the returned buffer
    /// posts a processing pass to the returned scheduler.
    pub fn from_config(
        cfg: &EngineConfig,
    ) -> Result<(Arc<SharedCommandBuffer>, CommandScheduler), ConfigError> {
        cfg.validate()?;

        let invalid_size = |e: CommandBufferError| ConfigError::InvalidRingBufferSize {
            size: cfg.ring_buffer_size,
            reason: e.to_string(),
        };
        let command_buffer = Arc::new(
            SharedCommandBuffer::with_size(cfg.ring_buffer_size).map_err(invalid_size)?,
        );

        let handler = LocalHandlerFactory::create_handler(&cfg.handler, command_buffer.clone())?;
        let parser =
            CommandParser::new(command_buffer.ring_buffer(), 0, handler).map_err(invalid_size)?;

        let (handle, queue) = task_queue();
        let processor = CommandProcessor::new(
            command_buffer.clone(),
            parser,
            cfg.commands_per_update,
            handle.clone(),
        )
        .with_policy(ErrorPolicy::new(cfg.recoverable_errors.iter().copied()));

        command_buffer.set_put_offset_change_callback(move || {
            handle.post(ScheduledTask::ProcessCommands);
        });

        Ok((command_buffer, CommandScheduler::new(processor, queue)))
    }
}
