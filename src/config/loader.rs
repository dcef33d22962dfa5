// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::backends::local::LocalHandlerFactory;
use crate::config::consts::{
    DEFAULT_COMMANDS_PER_UPDATE, DEFAULT_HANDLER, DEFAULT_LOG_LEVEL, DEFAULT_RING_BUFFER_SIZE,
    MAX_RING_BUFFER_SIZE, MIN_RING_BUFFER_SIZE,
};
use crate::errors::ConfigError;
use crate::protocol::{ParseError, ENTRY_SIZE};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Configuration for one command-processing session.
///
/// Every field is optional in the YAML file and falls back to the values in
/// [`consts`](crate::config::consts).
///
/// # Fields
/// * `ring_buffer_size` - Ring size in bytes; a multiple of the 4-byte entry size
/// * `commands_per_update` - Commands run per pass before the processor yields
/// * `handler` - Name of the local backend to decode commands with
/// * `recoverable_errors` - Parse errors that are latched without stopping the session
/// * `log_level` - Default log filter for the binary
///
/// # Example
/// ```yaml
/// ring_buffer_size: 1048576
/// commands_per_update: 100
/// handler: accumulator
/// recoverable_errors: [unknown_command, invalid_arguments]
/// log_level: info
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub ring_buffer_size: usize,
    pub commands_per_update: usize,
    pub handler: String,
    pub recoverable_errors: Vec<ParseError>,
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ring_buffer_size: DEFAULT_RING_BUFFER_SIZE,
            commands_per_update: DEFAULT_COMMANDS_PER_UPDATE,
            handler: DEFAULT_HANDLER.to_string(),
            recoverable_errors: vec![ParseError::UnknownCommand, ParseError::InvalidArguments],
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl EngineConfig {
    /// Checks the values serde cannot: ring geometry, the pass budget, the
    /// handler name, and the recoverable set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let size = self.ring_buffer_size;
        let reason = if size % ENTRY_SIZE != 0 {
            Some(format!("must be a multiple of {} bytes", ENTRY_SIZE))
        } else if size < MIN_RING_BUFFER_SIZE {
            Some(format!("must be at least {} bytes", MIN_RING_BUFFER_SIZE))
        } else if size > MAX_RING_BUFFER_SIZE {
            Some(format!("must be at most {} bytes", MAX_RING_BUFFER_SIZE))
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(ConfigError::InvalidRingBufferSize { size, reason });
        }

        if self.commands_per_update == 0 {
            return Err(ConfigError::ZeroCommandsPerUpdate);
        }
        if !LocalHandlerFactory::is_implementation_available(&self.handler) {
            return Err(ConfigError::UnknownHandler(self.handler.clone()));
        }
        if self.recoverable_errors.contains(&ParseError::NoError) {
            return Err(ConfigError::InvalidRecoverableError(ParseError::NoError));
        }
        Ok(())
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let cfg: EngineConfig = serde_yaml::from_str(&content)?;
    Ok(cfg)
}

pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig, ConfigError> {
    let cfg = load_config(path)?;
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(yaml: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parse_basic_config() {
        let yaml = r#"
ring_buffer_size: 4096
commands_per_update: 2
handler: tracing
recoverable_errors: [unknown_command]
log_level: debug
"#;

        let cfg: EngineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.ring_buffer_size, 4096);
        assert_eq!(cfg.commands_per_update, 2);
        assert_eq!(cfg.handler, "tracing");
        assert_eq!(cfg.recoverable_errors, vec![ParseError::UnknownCommand]);
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let cfg: EngineConfig = serde_yaml::from_str("commands_per_update: 7").unwrap();
        assert_eq!(cfg.commands_per_update, 7);
        assert_eq!(cfg.ring_buffer_size, DEFAULT_RING_BUFFER_SIZE);
        assert_eq!(cfg.handler, DEFAULT_HANDLER);
        assert_eq!(
            cfg.recoverable_errors,
            vec![ParseError::UnknownCommand, ParseError::InvalidArguments]
        );
    }

    #[test]
    fn test_load_and_validate_valid_config() {
        let file = write_config("ring_buffer_size: 1024\nhandler: accumulator\n");
        let cfg = load_and_validate_config(file.path()).unwrap();
        assert_eq!(cfg.ring_buffer_size, 1024);
    }

    #[test]
    fn test_load_and_validate_rejects_bad_values() {
        let cases = [
            ("ring_buffer_size: 1022", "multiple of 4"),
            ("ring_buffer_size: 4", "at least"),
            ("ring_buffer_size: 1073741824", "at most"),
            ("commands_per_update: 0", "at least 1"),
            ("handler: gles2", "Unknown command handler"),
            ("recoverable_errors: [no_error]", "recoverable"),
        ];

        for (yaml, expected) in cases {
            let file = write_config(yaml);
            let error = load_and_validate_config(file.path()).unwrap_err();
            assert!(
                error.to_string().contains(expected),
                "'{}' gave '{}'",
                yaml,
                error
            );
        }
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config("/nonexistent/ringwood.yaml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_unknown_error_name() {
        let file = write_config("recoverable_errors: [segfault]");
        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
    }
}
