// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // command handler backends
pub mod buffer;     // shared memory, ring view, shared state, writer
pub mod config;     // config + session builder
pub mod engine;     // parser, processor, scheduler
pub mod errors;     // error handling
pub mod observability;
pub mod protocol;   // wire format and parse error codes
pub mod traits;     // unified abstractions
