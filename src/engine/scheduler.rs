// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Cooperative task queue that drives a [`CommandProcessor`].
//!
//! The processor never runs on its own thread. Work arrives as
//! [`ScheduledTask`]s posted through a [`SchedulerHandle`], either by the
//! owner (for example from the put-offset callback) or by the processor
//! itself when a pass leaves commands behind. The scheduler drains the queue
//! synchronously with [`CommandScheduler::run_pending`] or as a tokio task
//! with [`CommandScheduler::run`].

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::engine::processor::CommandProcessor;
use crate::observability::messages::engine::SchedulerStopped;
use crate::observability::messages::StructuredLog;

/// Work the scheduler can run against its processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledTask {
    /// Run one processing pass.
    ProcessCommands,
    /// Return the processor to `Idle` at the given offset.
    Reset { get_offset: usize },
}

/// Posting side of the task queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    sender: mpsc::UnboundedSender<ScheduledTask>,
}

impl SchedulerHandle {
    /// Queues `task`. Returns false once the scheduler is gone.
    pub fn post(&self, task: ScheduledTask) -> bool {
        self.sender.send(task).is_ok()
    }
}

/// Receiving side of the task queue, consumed by [`CommandScheduler::new`].
#[derive(Debug)]
pub struct TaskQueue {
    receiver: mpsc::UnboundedReceiver<ScheduledTask>,
}

/// Creates a connected handle and queue.
pub fn task_queue() -> (SchedulerHandle, TaskQueue) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (SchedulerHandle { sender }, TaskQueue { receiver })
}

pub struct CommandScheduler {
    processor: CommandProcessor,
    receiver: mpsc::UnboundedReceiver<ScheduledTask>,
    tasks_run: usize,
}

impl CommandScheduler {
    pub fn new(processor: CommandProcessor, queue: TaskQueue) -> Self {
        Self {
            processor,
            receiver: queue.receiver,
            tasks_run: 0,
        }
    }

    pub fn handle(&self) -> SchedulerHandle {
        self.processor.scheduler_handle().clone()
    }

    pub fn processor(&self) -> &CommandProcessor {
        &self.processor
    }

    pub fn processor_mut(&mut self) -> &mut CommandProcessor {
        &mut self.processor
    }

    /// Total tasks run over the scheduler's lifetime.
    pub fn tasks_run(&self) -> usize {
        self.tasks_run
    }

    /// Runs the tasks queued at the time of the call and returns how many ran.
    ///
    /// Tasks posted while these run, including the processor's own follow-up
    /// passes, wait for the next call.
    pub fn run_pending(&mut self) -> usize {
        let mut pending = Vec::new();
        while let Ok(task) = self.receiver.try_recv() {
            pending.push(task);
        }
        for task in &pending {
            self.run_task(*task);
        }
        pending.len()
    }

    /// Runs tasks as they arrive until `shutdown` is cancelled, yielding to
    /// the runtime between tasks. Returns the processor for inspection.
    pub async fn run(mut self, shutdown: CancellationToken) -> CommandProcessor {
        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                task = self.receiver.recv() => match task {
                    Some(task) => self.run_task(task),
                    None => break,
                },
            }
            tokio::task::yield_now().await;
        }

        SchedulerStopped {
            tasks_run: self.tasks_run,
        }
        .log();
        self.processor
    }

    fn run_task(&mut self, task: ScheduledTask) {
        self.tasks_run += 1;
        match task {
            ScheduledTask::ProcessCommands => {
                self.processor.process_commands();
            }
            ScheduledTask::Reset { get_offset } => {
                if let Err(e) = self.processor.reset(get_offset) {
                    tracing::warn!(get_offset, error = %e, "Ignoring reset request");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::RecordingHandler;
    use crate::buffer::{CommandWriter, SharedCommandBuffer};
    use crate::engine::parser::CommandParser;
    use crate::engine::processor::ProcessorState;
    use crate::traits::CommandBuffer;
    use std::sync::Arc;

    fn scheduler(commands_per_update: usize) -> (Arc<SharedCommandBuffer>, CommandScheduler) {
        let command_buffer = Arc::new(SharedCommandBuffer::with_size(256).unwrap());
        let parser = CommandParser::new(
            command_buffer.ring_buffer(),
            0,
            Box::new(RecordingHandler::new()),
        )
        .unwrap();
        let (handle, queue) = task_queue();
        let processor =
            CommandProcessor::new(command_buffer.clone(), parser, commands_per_update, handle);
        (command_buffer, CommandScheduler::new(processor, queue))
    }

    #[test]
    fn test_run_pending_only_runs_queued_tasks() {
        let (command_buffer, mut scheduler) = scheduler(2);
        let mut writer = CommandWriter::new(command_buffer.clone());
        for _ in 0..5 {
            writer.write_command(20, &[]).unwrap();
        }
        writer.flush();

        assert!(scheduler.handle().post(ScheduledTask::ProcessCommands));
        assert_eq!(scheduler.run_pending(), 1);
        assert_eq!(command_buffer.get_state().get_offset, 2);

        assert_eq!(scheduler.run_pending(), 1);
        assert_eq!(scheduler.run_pending(), 1);
        assert_eq!(command_buffer.get_state().get_offset, 5);
        assert_eq!(scheduler.run_pending(), 0);
        assert_eq!(scheduler.tasks_run(), 3);
    }

    #[test]
    fn test_reset_task_rejects_offsets_outside_ring() {
        let (_command_buffer, mut scheduler) = scheduler(10);
        scheduler.handle().post(ScheduledTask::Reset { get_offset: 1000 });
        assert_eq!(scheduler.run_pending(), 1);
        assert_eq!(scheduler.processor().state(), ProcessorState::Idle);
        assert_eq!(scheduler.processor().get_offset(), 0);
    }

    #[tokio::test]
    async fn test_run_stops_on_cancellation() {
        let (command_buffer, scheduler) = scheduler(1);
        let handle = scheduler.handle();
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(scheduler.run(shutdown.clone()));

        let mut writer = CommandWriter::new(command_buffer.clone());
        writer.write_command(20, &[1]).unwrap();
        writer.write_command(21, &[]).unwrap();
        writer.flush();
        handle.post(ScheduledTask::ProcessCommands);

        while command_buffer.get_state().get_offset != 3 {
            tokio::task::yield_now().await;
        }

        shutdown.cancel();
        let processor = task.await.unwrap();
        assert_eq!(processor.state(), ProcessorState::Idle);
    }
}
