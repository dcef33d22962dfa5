use crate::buffer::RingBuffer;
use crate::protocol::ParseError;

/// Execution backend that the parser dispatches decoded commands to.
///
/// Backends are swapped by construction: production decoders, the common
/// command layer, and test doubles all implement this one trait.
pub trait CommandHandler: Send {
    /// Executes `command` with `arg_count` argument entries.
    fn do_command(&mut self, command: u32, arg_count: usize, args: CommandArgs<'_>) -> ParseError;

    /// Prepares the backend for a processing pass. Returning `false` skips the pass.
    fn make_current(&mut self) -> bool {
        true
    }

    fn name(&self) -> &'static str;
}

/// Borrowed view of one command's entries inside the ring.
///
/// `offset` is where the command's header sits; arguments follow it
/// contiguously because commands never wrap.
#[derive(Clone, Copy)]
pub struct CommandArgs<'a> {
    ring: &'a RingBuffer,
    offset: usize,
    len: usize,
}

impl<'a> CommandArgs<'a> {
    pub(crate) fn new(ring: &'a RingBuffer, offset: usize, len: usize) -> Self {
        Self { ring, offset, len }
    }

    /// Ring offset of the command header.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, index: usize) -> Option<u32> {
        (index < self.len).then(|| self.ring.entry(self.offset + 1 + index))
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + 'a {
        let ring = self.ring;
        let start = self.offset + 1;
        (0..self.len).map(move |index| ring.entry(start + index))
    }

    pub fn to_vec(&self) -> Vec<u32> {
        self.iter().collect()
    }
}

impl std::fmt::Debug for CommandArgs<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandArgs")
            .field("offset", &self.offset)
            .field("args", &self.to_vec())
            .finish()
    }
}
