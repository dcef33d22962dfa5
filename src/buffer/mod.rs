// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Memory shared between a command producer and the command processor.
//!
//! * [`SharedMemory`] - a word-addressed region both sides hold a handle to
//! * [`RingBuffer`] - the circular view the processor consumes commands from
//! * [`TransferBufferRegistry`] - auxiliary regions looked up by id
//! * [`SharedCommandBuffer`] - the get/put/token/error counters plus the above
//! * [`CommandWriter`] - producer side helper that encodes commands into the ring

mod command_buffer;
mod ring_buffer;
mod shared_memory;
mod transfer_buffers;
mod writer;

pub use command_buffer::{SharedCommandBuffer, State};
pub use ring_buffer::RingBuffer;
pub use shared_memory::{Buffer, SharedMemory};
pub use transfer_buffers::TransferBufferRegistry;
pub use writer::CommandWriter;
