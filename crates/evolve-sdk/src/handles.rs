//! Thread-safe handle registry for native resources
//!
//! Maps opaque [`Handle`] ids to the resources a service owns. Used by the
//! memory and file services.
//!
//! Ids come from a monotonically increasing counter and are never handed
//! out twice, so a missing id below the counter was released and anything
//! at or above it was never issued. Released entries are removed outright.

use crate::error::{BuiltinError, BuiltinResult};
use crate::value::{Handle, HandleKind};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Registry mapping handle ids to live resources of one [`HandleKind`].
pub struct HandleRegistry<T> {
    kind: HandleKind,
    map: DashMap<u64, T>,
    next_id: AtomicU64,
}

impl<T> HandleRegistry<T> {
    /// Create a new empty registry issuing handles of `kind`.
    pub fn new(kind: HandleKind) -> Self {
        Self {
            kind,
            map: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Insert a value and return its handle.
    pub fn insert(&self, value: T) -> Handle {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.map.insert(id, value);
        Handle::new(self.kind, id)
    }

    /// Run `f` against the live value behind `handle`.
    pub fn with<R>(&self, handle: Handle, f: impl FnOnce(&T) -> R) -> BuiltinResult<R> {
        self.check_kind(handle)?;
        match self.map.get(&handle.id()) {
            Some(entry) => Ok(f(entry.value())),
            None => Err(self.missing(handle)),
        }
    }

    /// Run `f` against the live value behind `handle`, mutably.
    pub fn with_mut<R>(&self, handle: Handle, f: impl FnOnce(&mut T) -> R) -> BuiltinResult<R> {
        self.check_kind(handle)?;
        match self.map.get_mut(&handle.id()) {
            Some(mut entry) => Ok(f(entry.value_mut())),
            None => Err(self.missing(handle)),
        }
    }

    /// Remove the value from the registry.
    ///
    /// Fails if the handle was never issued or has already been released.
    pub fn release(&self, handle: Handle) -> BuiltinResult<T> {
        self.check_kind(handle)?;
        match self.map.remove(&handle.id()) {
            Some((_, v)) => Ok(v),
            None => Err(self.missing(handle)),
        }
    }

    /// Number of live values
    pub fn live_count(&self) -> usize {
        self.map.len()
    }

    /// Release every live value, returning them ordered by handle id.
    pub fn drain_live(&self) -> Vec<(Handle, T)> {
        let ids: Vec<u64> = self.map.iter().map(|entry| *entry.key()).collect();
        let mut drained: Vec<(Handle, T)> = ids
            .into_iter()
            .filter_map(|id| self.map.remove(&id))
            .map(|(id, v)| (Handle::new(self.kind, id), v))
            .collect();
        drained.sort_by_key(|(h, _)| h.id());
        drained
    }

    fn check_kind(&self, handle: Handle) -> BuiltinResult<()> {
        if handle.kind() == self.kind {
            Ok(())
        } else {
            Err(BuiltinError::InvalidHandle {
                handle,
                reason: match self.kind {
                    HandleKind::Memory => "not a memory handle",
                    HandleKind::File => "not a file handle",
                },
            })
        }
    }

    fn missing(&self, handle: Handle) -> BuiltinError {
        let issued = handle.id() != 0 && handle.id() < self.next_id.load(Ordering::SeqCst);
        BuiltinError::InvalidHandle {
            handle,
            reason: if issued { "already released" } else { "never issued" },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn reason(err: BuiltinError) -> &'static str {
        match err {
            BuiltinError::InvalidHandle { reason, .. } => reason,
            other => panic!("expected InvalidHandle, got {:?}", other),
        }
    }

    #[test]
    fn test_insert_and_release_once() {
        let reg = HandleRegistry::new(HandleKind::Memory);
        let h = reg.insert("block");
        assert_eq!(reg.live_count(), 1);
        assert_eq!(reg.release(h).unwrap(), "block");
        assert_eq!(reg.live_count(), 0);

        let err = reg.release(h).unwrap_err();
        assert_eq!(
            err,
            BuiltinError::InvalidHandle {
                handle: h,
                reason: "already released"
            }
        );
    }

    #[test]
    fn test_ids_are_never_reused() {
        let reg = HandleRegistry::new(HandleKind::File);
        let a = reg.insert(1);
        reg.release(a).unwrap();
        let b = reg.insert(2);
        assert_ne!(a.id(), b.id());
        assert_eq!(reason(reg.with(a, |_| ()).unwrap_err()), "already released");
        assert_eq!(reg.with(b, |v| *v).unwrap(), 2);
    }

    #[test]
    fn test_released_entries_are_removed() {
        let reg = HandleRegistry::new(HandleKind::Memory);
        let mut last = None;
        for i in 0..10_000u32 {
            let h = reg.insert(i);
            reg.release(h).unwrap();
            last = Some(h);
        }
        assert_eq!(reg.map.len(), 0);
        assert_eq!(reg.live_count(), 0);
        assert_eq!(reason(reg.release(last.unwrap()).unwrap_err()), "already released");
    }

    #[test]
    fn test_unknown_and_wrong_kind() {
        let reg: HandleRegistry<u8> = HandleRegistry::new(HandleKind::Memory);
        let forged = Handle::new(HandleKind::Memory, 99);
        assert_eq!(reason(reg.release(forged).unwrap_err()), "never issued");
        assert_eq!(
            reason(reg.with(Handle::new(HandleKind::Memory, 0), |_| ()).unwrap_err()),
            "never issued"
        );

        let h = reg.insert(0);
        let wrong = Handle::new(HandleKind::File, h.id());
        let err = reg.with(wrong, |_| ()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidHandle);
        assert_eq!(reason(err), "not a memory handle");
        assert_eq!(reg.live_count(), 1);
    }

    #[test]
    fn test_with_mut_and_drain() {
        let reg = HandleRegistry::new(HandleKind::Memory);
        let a = reg.insert(1u32);
        let b = reg.insert(2u32);
        let c = reg.insert(3u32);
        reg.with_mut(b, |v| *v += 40).unwrap();
        reg.release(c).unwrap();

        assert_eq!(reg.live_count(), 2);

        let drained = reg.drain_live();
        assert_eq!(drained, vec![(a, 1), (b, 42)]);
        assert_eq!(reg.live_count(), 0);
        assert!(reg.drain_live().is_empty());
        assert_eq!(reason(reg.with(a, |_| ()).unwrap_err()), "already released");
    }
}
