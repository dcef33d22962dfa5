// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod parser;
pub mod policy;
pub mod processor;
pub mod scheduler;

pub use parser::{CommandParser, ParseStatus};
pub use policy::{ErrorClass, ErrorPolicy};
pub use processor::{CommandProcessor, ProcessorState};
pub use scheduler::{task_queue, CommandScheduler, ScheduledTask, SchedulerHandle, TaskQueue};
