// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::buffer::SharedMemory;
use crate::errors::CommandBufferError;

/// Circular view of the first `entry_count` words of a [`SharedMemory`] region.
///
/// Offsets are entry indices. Every accessor wraps its offset modulo the
/// capacity, so callers can pass `get + n` without reducing it first.
#[derive(Debug, Clone)]
pub struct RingBuffer {
    memory: SharedMemory,
    entry_count: usize,
}

impl RingBuffer {
    pub fn new(memory: SharedMemory, entry_count: usize) -> Result<Self, CommandBufferError> {
        if entry_count == 0 {
            return Err(CommandBufferError::ZeroCapacity);
        }
        if entry_count > memory.len_words() {
            return Err(CommandBufferError::RingExceedsRegion {
                entries: entry_count,
                region_entries: memory.len_words(),
            });
        }
        Ok(Self {
            memory,
            entry_count,
        })
    }

    /// A ring spanning the whole region.
    pub fn from_memory(memory: SharedMemory) -> Self {
        let entry_count = memory.len_words();
        Self {
            memory,
            entry_count,
        }
    }

    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    pub fn memory(&self) -> &SharedMemory {
        &self.memory
    }

    pub fn wrap(&self, offset: usize) -> usize {
        offset % self.entry_count
    }

    pub fn advance(&self, offset: usize, by: usize) -> usize {
        (self.wrap(offset) + by % self.entry_count) % self.entry_count
    }

    /// Entries walked going forward from `from` until `to` is reached.
    pub fn entries_between(&self, from: usize, to: usize) -> usize {
        let from = self.wrap(from);
        let to = self.wrap(to);
        if to >= from {
            to - from
        } else {
            self.entry_count - from + to
        }
    }

    pub fn entry(&self, offset: usize) -> u32 {
        // `wrap` keeps the index below `entry_count`, which `new` checked
        // against the region length.
        self.memory.get(self.wrap(offset)).unwrap_or_default()
    }

    pub fn set_entry(&self, offset: usize, value: u32) {
        self.memory.set(self.wrap(offset), value);
    }
}
