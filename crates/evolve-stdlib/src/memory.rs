//! Memory service - script-requested native allocations
//!
//! Scripts never see an address. `allocate` returns an opaque memory
//! [`Handle`] and every later access goes through this service, which
//! checks the handle is live and the range is in bounds.

use evolve_sdk::{BuiltinError, BuiltinResult, Handle, HandleKind, HandleRegistry};
use std::sync::atomic::{AtomicU64, Ordering};

/// Size limits enforced on script allocations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryLimits {
    /// Largest single allocation in bytes
    pub max_allocation_bytes: u64,
    /// Largest total of live allocations in bytes
    pub max_total_bytes: u64,
}

impl Default for MemoryLimits {
    fn default() -> Self {
        Self {
            max_allocation_bytes: 64 * 1024 * 1024,
            max_total_bytes: 256 * 1024 * 1024,
        }
    }
}

struct Block {
    bytes: Vec<u8>,
}

/// Tracks live allocations by handle.
pub struct MemoryService {
    blocks: HandleRegistry<Block>,
    limits: MemoryLimits,
    live_bytes: AtomicU64,
}

impl MemoryService {
    /// Create a service with the given limits
    pub fn new(limits: MemoryLimits) -> Self {
        Self {
            blocks: HandleRegistry::new(HandleKind::Memory),
            limits,
            live_bytes: AtomicU64::new(0),
        }
    }

    /// Reserve `size` zeroed bytes. `size == 0` is a valid, empty allocation.
    pub fn allocate(&self, size: u64) -> BuiltinResult<Handle> {
        if size > self.limits.max_allocation_bytes {
            return Err(BuiltinError::OutOfMemory {
                requested: size,
                reason: format!("per-allocation limit is {} bytes", self.limits.max_allocation_bytes),
            });
        }
        let max_total = self.limits.max_total_bytes;
        self.live_bytes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |cur| {
                cur.checked_add(size).filter(|total| *total <= max_total)
            })
            .map_err(|cur| BuiltinError::OutOfMemory {
                requested: size,
                reason: format!("{} of {} bytes already in use", cur, max_total),
            })?;

        let bytes = match zeroed(size) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.live_bytes.fetch_sub(size, Ordering::SeqCst);
                return Err(e);
            }
        };
        let handle = self.blocks.insert(Block { bytes });
        tracing::debug!(%handle, size, "allocate");
        Ok(handle)
    }

    /// Return an allocation. Fails on an unknown or already released handle.
    pub fn release(&self, handle: Handle) -> BuiltinResult<()> {
        let block = self.blocks.release(handle)?;
        self.live_bytes.fetch_sub(block.bytes.len() as u64, Ordering::SeqCst);
        tracing::debug!(%handle, size = block.bytes.len(), "release");
        Ok(())
    }

    /// Size of a live allocation in bytes
    pub fn size(&self, handle: Handle) -> BuiltinResult<u64> {
        self.blocks.with(handle, |b| b.bytes.len() as u64)
    }

    /// Copy `len` bytes starting at `offset` out of the allocation.
    pub fn read(&self, handle: Handle, offset: u64, len: u64) -> BuiltinResult<Vec<u8>> {
        self.blocks.with(handle, |b| {
            let range = bounds(handle, b.bytes.len(), offset, len)?;
            Ok(b.bytes[range].to_vec())
        })?
    }

    /// Copy `data` into the allocation at `offset`, returning the byte count.
    pub fn write(&self, handle: Handle, offset: u64, data: &[u8]) -> BuiltinResult<u64> {
        self.blocks.with_mut(handle, |b| {
            let range = bounds(handle, b.bytes.len(), offset, data.len() as u64)?;
            b.bytes[range].copy_from_slice(data);
            Ok(data.len() as u64)
        })?
    }

    /// Number of live allocations
    pub fn live_count(&self) -> usize {
        self.blocks.live_count()
    }

    /// Total bytes held by live allocations
    pub fn live_bytes(&self) -> u64 {
        self.live_bytes.load(Ordering::SeqCst)
    }

    /// Release every live allocation, returning how many there were.
    pub fn release_all(&self) -> usize {
        let drained = self.blocks.drain_live();
        for (handle, block) in &drained {
            self.live_bytes.fetch_sub(block.bytes.len() as u64, Ordering::SeqCst);
            tracing::debug!(%handle, size = block.bytes.len(), "release (cleanup)");
        }
        drained.len()
    }
}

impl Default for MemoryService {
    fn default() -> Self {
        Self::new(MemoryLimits::default())
    }
}

fn zeroed(size: u64) -> BuiltinResult<Vec<u8>> {
    let oom = |reason: &str| BuiltinError::OutOfMemory {
        requested: size,
        reason: reason.to_string(),
    };
    let len = usize::try_from(size).map_err(|_| oom("size exceeds address space"))?;
    let mut bytes = Vec::new();
    bytes.try_reserve_exact(len).map_err(|_| oom("heap allocation failed"))?;
    bytes.resize(len, 0);
    Ok(bytes)
}

fn bounds(handle: Handle, size: usize, offset: u64, len: u64) -> BuiltinResult<std::ops::Range<usize>> {
    let out_of_bounds = || BuiltinError::OutOfBounds {
        handle,
        offset,
        len,
        size: size as u64,
    };
    let end = offset.checked_add(len).ok_or_else(out_of_bounds)?;
    if end > size as u64 {
        return Err(out_of_bounds());
    }
    Ok(offset as usize..end as usize)
}
