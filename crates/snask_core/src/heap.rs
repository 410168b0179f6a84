//! Allocation accounting for runtime strings and objects.
//!
//! Payloads are owned by their `Arc` handles and freed when the last handle
//! drops. This module only keeps the process-wide counters: every tracked
//! construction registers here and every drop releases its entry exactly once.
//! Counters are atomics, so registration from one thread never blocks or
//! invalidates another thread's payload.

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

static LIVE_OBJECTS: AtomicUsize = AtomicUsize::new(0);
static LIVE_STRINGS: AtomicUsize = AtomicUsize::new(0);
static LIVE_STRING_BYTES: AtomicUsize = AtomicUsize::new(0);
static TOTAL_ALLOCS: AtomicU64 = AtomicU64::new(0);

/// Handle to a tracked object, unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub u64);

#[inline]
pub(crate) fn track_string(len: usize) {
    LIVE_STRINGS.fetch_add(1, Ordering::Relaxed);
    LIVE_STRING_BYTES.fetch_add(len, Ordering::Relaxed);
    TOTAL_ALLOCS.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub(crate) fn release_string(len: usize) {
    LIVE_STRINGS.fetch_sub(1, Ordering::Relaxed);
    LIVE_STRING_BYTES.fetch_sub(len, Ordering::Relaxed);
}

/// Registers a new object and hands out its id.
#[inline]
pub(crate) fn track_object() -> ObjectId {
    LIVE_OBJECTS.fetch_add(1, Ordering::Relaxed);
    ObjectId(TOTAL_ALLOCS.fetch_add(1, Ordering::Relaxed))
}

#[inline]
pub(crate) fn release_object() {
    LIVE_OBJECTS.fetch_sub(1, Ordering::Relaxed);
}

/// Snapshot of the allocation counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeapStats {
    pub live_objects: usize,
    pub live_strings: usize,
    pub live_string_bytes: usize,
    pub total_allocations: u64,
}

pub fn stats() -> HeapStats {
    HeapStats {
        live_objects: LIVE_OBJECTS.load(Ordering::Relaxed),
        live_strings: LIVE_STRINGS.load(Ordering::Relaxed),
        live_string_bytes: LIVE_STRING_BYTES.load(Ordering::Relaxed),
        total_allocations: TOTAL_ALLOCS.load(Ordering::Relaxed),
    }
}

impl HeapStats {
    pub fn memory_stats(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for HeapStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Heap: objects={}, strings={} ({} bytes), total_allocs={}",
            self.live_objects, self.live_strings, self.live_string_bytes, self.total_allocations
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_ids_are_unique() {
        let a = track_object();
        let b = track_object();
        release_object();
        release_object();
        assert_ne!(a, b);
    }

    #[test]
    fn total_allocations_only_grow() {
        let before = stats().total_allocations;
        track_string(5);
        release_string(5);
        assert!(stats().total_allocations > before);
    }

    #[test]
    fn display_mentions_every_counter() {
        let s = HeapStats {
            live_objects: 1,
            live_strings: 2,
            live_string_bytes: 3,
            total_allocations: 4,
        }
        .memory_stats();
        assert_eq!(s, "Heap: objects=1, strings=2 (3 bytes), total_allocs=4");
    }
}
