/// Default ring buffer size in bytes (256K entries)
pub const DEFAULT_RING_BUFFER_SIZE: usize = 1024 * 1024;
/// Smallest ring that can hold a command: one entry plus the one kept free
pub const MIN_RING_BUFFER_SIZE: usize = 8;
/// Largest ring buffer accepted from configuration (256 MiB)
pub const MAX_RING_BUFFER_SIZE: usize = 256 * 1024 * 1024;
/// Default number of commands run per processing pass
pub const DEFAULT_COMMANDS_PER_UPDATE: usize = 100;
/// Default command handler
pub const DEFAULT_HANDLER: &str = "accumulator";
/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_LEVEL: &str = "info";
