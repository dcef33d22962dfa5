// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Execution backends for The Ringwood command processor.
//!
//! A backend is anything implementing [`CommandHandler`](crate::traits::CommandHandler):
//! the parser hands it each decoded command and records the returned
//! [`ParseError`](crate::protocol::ParseError). Backends are swapped by
//! construction.
//!
//! # Available Backends
//!
//! ## Common Decoder
//! [`CommonDecoder`] handles the reserved opcodes (`Noop`, `SetToken`) and
//! forwards everything else to the backend it wraps.
//!
//! ## Local Backend
//! In-process decoders built by name from configuration:
//! - **accumulator**: integer accumulator that reads and writes transfer buffers
//! - **tracing**: logs every command and accepts it
//!
//! ## Stub Backend (Test-Only)
//! `RecordingHandler` records every command and returns scripted codes.
//! Only available in test builds.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use the_ringwood::backends::local::LocalHandlerFactory;
//! use the_ringwood::buffer::SharedCommandBuffer;
//!
//! let command_buffer = Arc::new(SharedCommandBuffer::with_size(1024)?);
//! let handler = LocalHandlerFactory::create_handler("accumulator", command_buffer)?;
//! assert_eq!(handler.name(), "accumulator");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod common;
pub mod local;
#[cfg(test)]
pub mod stub;

pub use common::CommonDecoder;
