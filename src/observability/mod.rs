// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Every diagnostic the engine emits goes through a message type from
//! [`messages`]. Message types are plain structs with a `Display`
//! implementation and a [`StructuredLog`](messages::StructuredLog)
//! implementation.
//!
//! # Usage
//!
//! ```rust
//! use the_ringwood::observability::messages::engine::FatalParseError;
//! use the_ringwood::observability::messages::StructuredLog;
//! use the_ringwood::protocol::ParseError;
//!
//! let msg = FatalParseError {
//!     error: ParseError::InvalidSize,
//!     get_offset: 12,
//! };
//!
//! msg.log();
//! ```

pub mod messages;
