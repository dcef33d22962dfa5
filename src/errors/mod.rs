// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod command_buffer;
mod config;

pub use command_buffer::CommandBufferError;
pub use config::ConfigError;
