// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::buffer::{Buffer, SharedMemory};
use crate::observability::messages::buffer::{TransferBufferRegistered, TransferBufferUnregistered};
use crate::observability::messages::StructuredLog;

/// Directory of auxiliary regions that commands refer to by id.
///
/// The registry never allocates; owners register regions they created and
/// unregister them when done. Lookups of unknown ids return an empty
/// [`Buffer`].
#[derive(Debug, Default)]
pub struct TransferBufferRegistry {
    buffers: RwLock<HashMap<u32, SharedMemory>>,
}

impl TransferBufferRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `memory` under `id`, returning the region it replaced.
    pub fn register(&self, id: u32, memory: SharedMemory) -> Option<SharedMemory> {
        TransferBufferRegistered {
            id,
            size: memory.size(),
        }
        .log();
        self.write().insert(id, memory)
    }

    pub fn unregister(&self, id: u32) -> Option<SharedMemory> {
        let removed = self.write().remove(&id);
        TransferBufferUnregistered {
            id,
            found: removed.is_some(),
        }
        .log();
        removed
    }

    pub fn lookup(&self, id: u32) -> Buffer {
        self.read()
            .get(&id)
            .cloned()
            .map(Buffer::new)
            .unwrap_or_default()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.read().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.read().keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    // Poisoning is ignored: no update leaves the map half-written.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<u32, SharedMemory>> {
        self.buffers.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<u32, SharedMemory>> {
        self.buffers.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_returns_registered_region() {
        let registry = TransferBufferRegistry::new();
        let memory = SharedMemory::new(64).unwrap();
        assert!(registry.register(7, memory.clone()).is_none());

        let buffer = registry.lookup(7);
        assert!(buffer.memory.as_ref().unwrap().ptr_eq(&memory));
        assert_eq!(buffer.size, 64);
    }

    #[test]
    fn test_unknown_id_is_empty() {
        let registry = TransferBufferRegistry::new();
        let buffer = registry.lookup(3);
        assert!(buffer.is_empty());
        assert_eq!(buffer.size, 0);
    }

    #[test]
    fn test_register_replaces_and_unregister_removes() {
        let registry = TransferBufferRegistry::new();
        let first = SharedMemory::new(8).unwrap();
        let second = SharedMemory::new(16).unwrap();

        registry.register(1, first.clone());
        let replaced = registry.register(1, second).unwrap();
        assert!(replaced.ptr_eq(&first));
        assert_eq!(registry.lookup(1).size, 16);

        registry.register(4, SharedMemory::new(4).unwrap());
        assert_eq!(registry.ids(), vec![1, 4]);

        assert!(registry.unregister(1).is_some());
        assert!(registry.unregister(1).is_none());
        assert!(!registry.contains(1));
        assert_eq!(registry.len(), 1);
    }
}
