// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::buffer::{RingBuffer, SharedCommandBuffer, State};
use crate::errors::CommandBufferError;
use crate::protocol::{CommandHeader, CommonCommand, MAX_COMMAND_ID, MAX_COMMAND_SIZE};
use crate::traits::CommandBuffer;

/// Producer side of a command buffer.
///
/// Commands are written at a local put offset and become visible to the
/// processor only on [`flush`](CommandWriter::flush). The writer never
/// blocks: if the processor has not consumed enough of the ring yet,
/// [`write_command`](CommandWriter::write_command) fails with
/// [`CommandBufferError::RingFull`] and the caller decides when to retry.
///
/// One entry is always left unused so that `get == put` unambiguously means
/// the ring is empty.
pub struct CommandWriter {
    command_buffer: Arc<SharedCommandBuffer>,
    ring: RingBuffer,
    put: usize,
    token: i32,
}

impl CommandWriter {
    pub fn new(command_buffer: Arc<SharedCommandBuffer>) -> Self {
        let state = command_buffer.get_state();
        let ring = command_buffer.ring_buffer();
        let put = ring.wrap(state.put_offset as usize);
        Self {
            command_buffer,
            ring,
            put,
            token: state.token,
        }
    }

    /// Local put offset, including commands not yet flushed.
    pub fn put_offset(&self) -> usize {
        self.put
    }

    /// Entries that can be written before catching up with the processor.
    pub fn available_entries(&self) -> usize {
        self.free_entries(self.consumer_get())
    }

    /// Encodes `command` and its arguments at the put offset.
    pub fn write_command(&mut self, command: u32, args: &[u32]) -> Result<(), CommandBufferError> {
        let entries = self.ring.entry_count();
        let header = CommandHeader::new(command, args.len()).ok_or_else(|| {
            if command > MAX_COMMAND_ID {
                CommandBufferError::InvalidOpcode(command)
            } else {
                CommandBufferError::CommandTooLarge {
                    size: args.len().saturating_add(1),
                    entries,
                }
            }
        })?;
        let size = header.size as usize;
        if size >= entries {
            return Err(CommandBufferError::CommandTooLarge { size, entries });
        }

        let get = self.consumer_get();
        let to_end = entries - self.put;
        if size > to_end {
            // The tail can be skipped only when the processor is not inside
            // it, and wrapping onto a processor parked at 0 would make the
            // ring look empty.
            if get > self.put || get == 0 {
                return Err(CommandBufferError::RingFull {
                    needed: to_end + size,
                    available: self.free_entries(get),
                });
            }
            // Padding stays written even if the head is still too full; once
            // the processor walks past it the retry fits.
            self.pad_to_end();
        }

        let available = self.free_entries(get);
        if size > available {
            return Err(CommandBufferError::RingFull {
                needed: size,
                available,
            });
        }

        self.ring.set_entry(self.put, header.to_entry());
        for (index, arg) in args.iter().enumerate() {
            self.ring.set_entry(self.put + 1 + index, *arg);
        }
        self.put = self.ring.advance(self.put, size);
        Ok(())
    }

    /// Writes a `SetToken` command carrying the next token value and returns it.
    pub fn insert_token(&mut self) -> Result<i32, CommandBufferError> {
        let token = self.token.wrapping_add(1) & i32::MAX;
        self.write_command(CommonCommand::SetToken.opcode(), &[token as u32])?;
        self.token = token;
        Ok(token)
    }

    /// True once the processor has executed the `SetToken` for `token`.
    pub fn has_token_passed(&self, token: i32) -> bool {
        self.command_buffer.get_state().token >= token
    }

    /// Makes everything written so far visible to the processor.
    pub fn flush(&mut self) -> State {
        self.command_buffer.flush(self.put as u32)
    }

    fn consumer_get(&self) -> usize {
        self.ring.wrap(self.command_buffer.get_state().get_offset as usize)
    }

    fn free_entries(&self, get: usize) -> usize {
        self.ring.entries_between(self.put, get + self.ring.entry_count() - 1)
    }

    /// Fills `[put, end)` with `Noop` commands and wraps put to 0.
    fn pad_to_end(&mut self) {
        let mut remaining = self.ring.entry_count() - self.put;
        while remaining > 0 {
            let chunk = remaining.min(MAX_COMMAND_SIZE);
            let noop = CommandHeader {
                size: chunk as u32,
                command: CommonCommand::Noop.opcode(),
            };
            self.ring.set_entry(self.put, noop.to_entry());
            self.put += chunk;
            remaining -= chunk;
        }
        self.put = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer(entries: usize) -> (Arc<SharedCommandBuffer>, CommandWriter) {
        let command_buffer = Arc::new(SharedCommandBuffer::with_size(entries * 4).unwrap());
        let writer = CommandWriter::new(command_buffer.clone());
        (command_buffer, writer)
    }

    #[test]
    fn test_writes_header_and_arguments() {
        let (command_buffer, mut writer) = writer(16);
        writer.write_command(20, &[5, 6]).unwrap();

        let ring = command_buffer.ring_buffer();
        assert_eq!(CommandHeader::from_entry(ring.entry(0)), CommandHeader { size: 3, command: 20 });
        assert_eq!(ring.entry(1), 5);
        assert_eq!(ring.entry(2), 6);
        assert_eq!(writer.put_offset(), 3);
        // Nothing is visible until flushed.
        assert_eq!(command_buffer.get_put_offset(), 0);
        assert_eq!(writer.flush().put_offset, 3);
    }

    #[test]
    fn test_leaves_one_entry_free() {
        let (_command_buffer, mut writer) = writer(8);
        assert_eq!(writer.available_entries(), 7);
        writer.write_command(20, &[0; 6]).unwrap();
        assert_eq!(writer.available_entries(), 0);
        assert_eq!(
            writer.write_command(20, &[]),
            Err(CommandBufferError::RingFull { needed: 1, available: 0 })
        );
    }

    #[test]
    fn test_rejects_commands_that_can_never_fit() {
        let (_command_buffer, mut writer) = writer(8);
        assert_eq!(
            writer.write_command(20, &[0; 7]),
            Err(CommandBufferError::CommandTooLarge { size: 8, entries: 8 })
        );
        assert_eq!(
            writer.write_command(MAX_COMMAND_ID + 1, &[]),
            Err(CommandBufferError::InvalidOpcode(MAX_COMMAND_ID + 1))
        );
    }

    #[test]
    fn test_pads_tail_with_noop_and_wraps() {
        let (command_buffer, mut writer) = writer(8);
        writer.write_command(20, &[0; 4]).unwrap();
        writer.flush();
        // Processor consumed everything.
        command_buffer.set_get_offset(5);

        writer.write_command(21, &[9, 9, 9]).unwrap();
        let ring = command_buffer.ring_buffer();
        let pad = CommandHeader::from_entry(ring.entry(5));
        assert_eq!(pad, CommandHeader { size: 3, command: CommonCommand::Noop.opcode() });
        assert_eq!(CommandHeader::from_entry(ring.entry(0)).command, 21);
        assert_eq!(writer.put_offset(), 4);
    }

    #[test]
    fn test_wrap_waits_for_processor_to_leave_head() {
        let (command_buffer, mut writer) = writer(8);
        writer.write_command(20, &[0; 4]).unwrap();
        writer.flush();
        command_buffer.set_get_offset(2);

        let result = writer.write_command(21, &[9, 9, 9]);
        assert!(matches!(result, Err(CommandBufferError::RingFull { needed: 4, available: 1 })));
        assert_eq!(writer.put_offset(), 0);

        // Processor walks over the padding and wraps.
        command_buffer.set_get_offset(0);
        writer.write_command(21, &[9, 9, 9]).unwrap();
        assert_eq!(writer.put_offset(), 4);
    }

    #[test]
    fn test_no_wrap_onto_processor_at_start() {
        let (_command_buffer, mut writer) = writer(8);
        writer.write_command(20, &[0; 4]).unwrap();

        let result = writer.write_command(21, &[9, 9, 9]);
        assert!(matches!(result, Err(CommandBufferError::RingFull { .. })));
        assert_eq!(writer.put_offset(), 5);
    }

    #[test]
    fn test_insert_token_writes_set_token() {
        let (command_buffer, mut writer) = writer(16);
        let token = writer.insert_token().unwrap();
        assert_eq!(token, 1);

        let ring = command_buffer.ring_buffer();
        let header = CommandHeader::from_entry(ring.entry(0));
        assert_eq!(header.command, CommonCommand::SetToken.opcode());
        assert_eq!(ring.entry(1), 1);
        assert!(!writer.has_token_passed(token));

        command_buffer.set_token(token);
        assert!(writer.has_token_passed(token));
    }
}
