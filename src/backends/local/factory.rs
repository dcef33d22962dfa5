use std::sync::Arc;

use super::handlers::*;
use crate::backends::common::CommonDecoder;
use crate::errors::ConfigError;
use crate::traits::{CommandBuffer, CommandHandler};

/// Factory for creating local (in-process) command handlers
pub struct LocalHandlerFactory;

impl LocalHandlerFactory {
    /// Create a handler by name, wrapped in a [`CommonDecoder`] so common
    /// commands work with every backend.
    ///
    /// - "accumulator" -> AccumulatorDecoder
    /// - "tracing" -> TracingDecoder
    pub fn create_handler(
        name: &str,
        command_buffer: Arc<dyn CommandBuffer>,
    ) -> Result<Box<dyn CommandHandler>, ConfigError> {
        match name {
            "accumulator" => Ok(Box::new(CommonDecoder::new(
                command_buffer.clone(),
                AccumulatorDecoder::new(command_buffer),
            ))),
            "tracing" => Ok(Box::new(CommonDecoder::new(
                command_buffer,
                TracingDecoder::new(),
            ))),
            _ => Err(ConfigError::UnknownHandler(name.to_string())),
        }
    }

    /// List all available local handler implementations
    pub fn list_available_implementations() -> Vec<&'static str> {
        vec!["accumulator", "tracing"]
    }

    /// Check if an implementation is available
    pub fn is_implementation_available(name: &str) -> bool {
        Self::list_available_implementations().contains(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::SharedCommandBuffer;

    #[test]
    fn test_create_known_handlers() {
        let command_buffer = Arc::new(SharedCommandBuffer::with_size(64).unwrap());
        for name in LocalHandlerFactory::list_available_implementations() {
            let handler = LocalHandlerFactory::create_handler(name, command_buffer.clone())
                .unwrap_or_else(|_| panic!("Failed to create handler: {}", name));
            assert_eq!(handler.name(), name);
        }
    }

    #[test]
    fn test_create_unknown_handler() {
        let command_buffer = Arc::new(SharedCommandBuffer::with_size(64).unwrap());
        let result = LocalHandlerFactory::create_handler("gles2", command_buffer);
        assert!(matches!(result, Err(ConfigError::UnknownHandler(name)) if name == "gles2"));
    }

    #[test]
    fn test_is_implementation_available() {
        assert!(LocalHandlerFactory::is_implementation_available("accumulator"));
        assert!(LocalHandlerFactory::is_implementation_available("tracing"));
        assert!(!LocalHandlerFactory::is_implementation_available("nonexistent_handler"));
    }
}
