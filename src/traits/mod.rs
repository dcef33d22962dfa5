pub mod command_buffer;
pub mod handler;

pub use command_buffer::CommandBuffer;
pub use handler::{CommandArgs, CommandHandler};
