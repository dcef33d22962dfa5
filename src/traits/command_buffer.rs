use crate::buffer::{Buffer, RingBuffer};
use crate::protocol::ParseError;

/// Counters and regions the command processor shares with its producer.
///
/// The processor is the only writer of the get offset, the parse error and
/// the error status; the producer is the only writer of the put offset.
/// Implementations must make these visible across threads (and, for real
/// shared memory, across processes) without the caller adding locks.
pub trait CommandBuffer: Send + Sync {
    /// The ring commands are read from.
    fn ring_buffer(&self) -> RingBuffer;

    /// Capacity of the ring in entries.
    fn size(&self) -> usize;

    /// Last offset the producer has made visible.
    fn get_put_offset(&self) -> u32;

    /// Publishes how far the processor has consumed.
    fn set_get_offset(&self, get_offset: u32);

    /// True once a fatal error has been raised.
    fn get_error_status(&self) -> bool;

    /// Latches `error`. Only the first error since the last reset is kept.
    fn set_parse_error(&self, error: ParseError);

    /// Marks the session as failed. Sticky until the owner clears it.
    fn raise_error_status(&self);

    /// Returns the latched error and clears it.
    fn reset_parse_error(&self) -> ParseError;

    fn set_token(&self, token: i32);

    /// Region registered under `id`, empty when there is none.
    fn get_transfer_buffer(&self, id: u32) -> Buffer;
}
