// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! In-process implementation of the shared command-buffer state.
//!
//! [`SharedCommandBuffer`] is the state holder both sides of a session talk
//! to. The processor uses it through the [`CommandBuffer`] trait; the owner
//! and the producer use the inherent methods to publish work, manage
//! transfer buffers, and inspect or clear errors.
//!
//! # Memory ordering
//!
//! The producer writes ring entries with relaxed stores and then publishes
//! `put` with a release store; the processor loads `put` with acquire before
//! reading entries. The same pairing runs the other way for `get`, so the
//! producer never overwrites entries the processor has not finished with.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering};
use std::sync::{Arc, RwLock};

use crate::buffer::{Buffer, RingBuffer, SharedMemory, TransferBufferRegistry};
use crate::errors::CommandBufferError;
use crate::observability::messages::buffer::{ErrorStatusCleared, PutOffsetPublished};
use crate::observability::messages::StructuredLog;
use crate::protocol::ParseError;
use crate::traits::CommandBuffer;

type PutOffsetChangeCallback = Arc<dyn Fn() + Send + Sync>;

/// Snapshot of the shared counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct State {
    pub num_entries: usize,
    pub get_offset: u32,
    pub put_offset: u32,
    pub token: i32,
    pub error: ParseError,
    pub error_status: bool,
}

pub struct SharedCommandBuffer {
    ring: RingBuffer,
    get_offset: AtomicU32,
    put_offset: AtomicU32,
    token: AtomicI32,
    parse_error: AtomicU32,
    error_status: AtomicBool,
    transfer_buffers: TransferBufferRegistry,
    next_transfer_buffer_id: AtomicU32,
    put_offset_change_callback: RwLock<Option<PutOffsetChangeCallback>>,
}

impl SharedCommandBuffer {
    pub fn new(ring: RingBuffer) -> Self {
        Self {
            ring,
            get_offset: AtomicU32::new(0),
            put_offset: AtomicU32::new(0),
            token: AtomicI32::new(0),
            parse_error: AtomicU32::new(ParseError::NoError.into()),
            error_status: AtomicBool::new(false),
            transfer_buffers: TransferBufferRegistry::new(),
            next_transfer_buffer_id: AtomicU32::new(1),
            put_offset_change_callback: RwLock::new(None),
        }
    }

    /// Allocates a ring of `size` bytes.
    pub fn with_size(size: usize) -> Result<Self, CommandBufferError> {
        let memory = SharedMemory::new(size)?;
        Ok(Self::new(RingBuffer::from_memory(memory)))
    }

    pub fn get_state(&self) -> State {
        State {
            num_entries: self.ring.entry_count(),
            get_offset: self.get_offset.load(Ordering::Acquire),
            put_offset: self.put_offset.load(Ordering::Acquire),
            token: self.token.load(Ordering::Acquire),
            error: self.latched_error(),
            error_status: self.error_status.load(Ordering::Acquire),
        }
    }

    /// Publishes `put_offset` and notifies the consumer.
    ///
    /// Offsets outside the ring are published as-is; the processor treats
    /// them as a fatal out-of-bounds error.
    pub fn flush(&self, put_offset: u32) -> State {
        self.put_offset.store(put_offset, Ordering::Release);
        PutOffsetPublished { put_offset }.log();

        let callback = self
            .put_offset_change_callback
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        if let Some(callback) = callback {
            callback();
        }
        self.get_state()
    }

    /// Installs the function called after every [`flush`](Self::flush).
    pub fn set_put_offset_change_callback<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self
            .put_offset_change_callback
            .write()
            .unwrap_or_else(|e| e.into_inner()) = Some(Arc::new(callback));
    }

    pub fn transfer_buffers(&self) -> &TransferBufferRegistry {
        &self.transfer_buffers
    }

    pub fn register_transfer_buffer(&self, id: u32, memory: SharedMemory) -> Option<SharedMemory> {
        self.transfer_buffers.register(id, memory)
    }

    pub fn unregister_transfer_buffer(&self, id: u32) -> Option<SharedMemory> {
        self.transfer_buffers.unregister(id)
    }

    /// Allocates a zeroed region of `size` bytes and registers it under a fresh id.
    pub fn create_transfer_buffer(&self, size: usize) -> Result<u32, CommandBufferError> {
        let memory = SharedMemory::new(size)?;
        loop {
            let id = self.next_transfer_buffer_id.fetch_add(1, Ordering::Relaxed);
            if id == u32::MAX {
                return Err(CommandBufferError::TransferBufferIdsExhausted);
            }
            // Skip ids an owner registered by hand.
            if !self.transfer_buffers.contains(id) {
                self.transfer_buffers.register(id, memory);
                return Ok(id);
            }
        }
    }

    /// Owner-side reset of the fatal flag. The latched code is left for
    /// [`reset_parse_error`](CommandBuffer::reset_parse_error).
    pub fn clear_error_status(&self) {
        self.error_status.store(false, Ordering::Release);
        ErrorStatusCleared {
            latched_error: self.latched_error(),
        }
        .log();
    }

    fn latched_error(&self) -> ParseError {
        // Only this type writes the latch, always from a `ParseError`.
        ParseError::from_u32(self.parse_error.load(Ordering::Acquire)).unwrap_or(ParseError::OutOfBounds)
    }
}

impl CommandBuffer for SharedCommandBuffer {
    fn ring_buffer(&self) -> RingBuffer {
        self.ring.clone()
    }

    fn size(&self) -> usize {
        self.ring.entry_count()
    }

    fn get_put_offset(&self) -> u32 {
        self.put_offset.load(Ordering::Acquire)
    }

    fn set_get_offset(&self, get_offset: u32) {
        self.get_offset.store(get_offset, Ordering::Release);
    }

    fn get_error_status(&self) -> bool {
        self.error_status.load(Ordering::Acquire)
    }

    fn set_parse_error(&self, error: ParseError) {
        // First error wins until the owner reads it back.
        let _ = self.parse_error.compare_exchange(
            ParseError::NoError.into(),
            error.into(),
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    fn raise_error_status(&self) {
        self.error_status.store(true, Ordering::Release);
    }

    fn reset_parse_error(&self) -> ParseError {
        let previous = self
            .parse_error
            .swap(ParseError::NoError.into(), Ordering::AcqRel);
        ParseError::from_u32(previous).unwrap_or(ParseError::OutOfBounds)
    }

    fn set_token(&self, token: i32) {
        self.token.store(token, Ordering::Release);
    }

    fn get_transfer_buffer(&self, id: u32) -> Buffer {
        self.transfer_buffers.lookup(id)
    }
}

impl std::fmt::Debug for SharedCommandBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedCommandBuffer")
            .field("state", &self.get_state())
            .field("transfer_buffers", &self.transfer_buffers.ids())
            .finish()
    }
}
