// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for loading and validating engine configuration.

use thiserror::Error;

use crate::protocol::ParseError;

/// Errors that can occur while loading or validating a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid YAML for this schema.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The ring buffer size cannot back a ring.
    #[error("Invalid ring_buffer_size {size}: {reason}")]
    InvalidRingBufferSize { size: usize, reason: String },

    /// A pass must be allowed to process at least one command.
    #[error("commands_per_update must be at least 1")]
    ZeroCommandsPerUpdate,

    /// `no_error` cannot be classified as an error.
    #[error("'{0:?}' cannot be listed as a recoverable error")]
    InvalidRecoverableError(ParseError),

    /// The configured handler name is not known.
    #[error("Unknown command handler '{0}'")]
    UnknownHandler(String),
}
