// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::errors::CommandBufferError;
use crate::protocol::ENTRY_SIZE;

/// A region of 32-bit words visible to both sides of a command buffer.
///
/// Cloning yields another handle to the same words. Individual words are
/// atomics so either side may read or write them without a lock; ordering
/// between sides is established by the get/put counters, not by the words.
#[derive(Clone)]
pub struct SharedMemory {
    words: Arc<[AtomicU32]>,
}

impl SharedMemory {
    /// Allocates a zeroed region of `size` bytes.
    pub fn new(size: usize) -> Result<Self, CommandBufferError> {
        if size == 0 {
            return Err(CommandBufferError::ZeroCapacity);
        }
        if size % ENTRY_SIZE != 0 {
            return Err(CommandBufferError::MisalignedSize {
                size,
                stride: ENTRY_SIZE,
            });
        }
        Ok(Self::with_words(size / ENTRY_SIZE))
    }

    fn with_words(count: usize) -> Self {
        let words: Arc<[AtomicU32]> = (0..count).map(|_| AtomicU32::new(0)).collect();
        Self { words }
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.words.len() * ENTRY_SIZE
    }

    pub fn len_words(&self) -> usize {
        self.words.len()
    }

    pub fn get(&self, index: usize) -> Option<u32> {
        self.words.get(index).map(|word| word.load(Ordering::Relaxed))
    }

    /// Stores `value` at `index`; returns `false` when `index` is outside the region.
    pub fn set(&self, index: usize, value: u32) -> bool {
        match self.words.get(index) {
            Some(word) => {
                word.store(value, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    /// Address of the first word, for identity checks and diagnostics.
    pub fn as_ptr(&self) -> *const AtomicU32 {
        self.words.as_ptr()
    }

    /// True when both handles refer to the same region.
    pub fn ptr_eq(&self, other: &SharedMemory) -> bool {
        Arc::ptr_eq(&self.words, &other.words)
    }
}

impl fmt::Debug for SharedMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedMemory")
            .field("ptr", &self.as_ptr())
            .field("size", &self.size())
            .finish()
    }
}

/// A (region, size) pair handed to command handlers.
///
/// The default value is the empty buffer returned for unknown ids. Check
/// [`Buffer::is_empty`] before touching the memory.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    pub memory: Option<SharedMemory>,
    pub size: usize,
}

impl Buffer {
    pub fn new(memory: SharedMemory) -> Self {
        let size = memory.size();
        Self {
            memory: Some(memory),
            size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.memory.is_none() || self.size == 0
    }

    /// Address of the region, null for the empty buffer.
    pub fn ptr(&self) -> *const AtomicU32 {
        self.memory
            .as_ref()
            .map_or(std::ptr::null(), SharedMemory::as_ptr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_and_misaligned_sizes() {
        assert_eq!(SharedMemory::new(0).unwrap_err(), CommandBufferError::ZeroCapacity);
        assert_eq!(
            SharedMemory::new(10).unwrap_err(),
            CommandBufferError::MisalignedSize { size: 10, stride: 4 }
        );
    }

    #[test]
    fn test_clones_share_words() {
        let memory = SharedMemory::new(16).unwrap();
        let other = memory.clone();
        assert!(other.set(3, 42));
        assert_eq!(memory.get(3), Some(42));
        assert!(memory.ptr_eq(&other));
        assert!(!memory.set(4, 1));
        assert_eq!(memory.get(4), None);
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = Buffer::default();
        assert!(buffer.is_empty());
        assert!(buffer.ptr().is_null());

        let memory = SharedMemory::new(8).unwrap();
        let buffer = Buffer::new(memory.clone());
        assert!(!buffer.is_empty());
        assert_eq!(buffer.size, 8);
        assert_eq!(buffer.ptr(), memory.as_ptr());
    }
}
