//! Ordered association container.
//!
//! An `Object` stores parallel arrays of optional keys and values. Entries
//! appended through the array helpers carry no key of their own; their
//! effective key is the decimal position ("0", "1", ...). Named entries are
//! indexed by a hash map for O(1) lookup. Entries are never removed, so
//! positions stay stable once assigned.

use crate::heap::{self, ObjectId};
use crate::value::{MAX_INDEX_GAP, Value};
use ahash::RandomState;
use hashbrown::HashMap;
use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub type FastHashMap<K, V> = HashMap<K, V, RandomState>;

fn fast_hasher() -> RandomState {
    RandomState::with_seeds(0, 0, 0, 0)
}

#[derive(Clone, Default)]
pub struct Object {
    keys: Vec<Option<Arc<str>>>,
    values: Vec<Value>,
    index: FastHashMap<Arc<str>, usize>,
}

/// Parses a canonical decimal position ("0", "17", but not "01" or "+1").
fn parse_position(key: &str) -> Option<usize> {
    let bytes = key.as_bytes();
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if bytes.len() > 1 && bytes[0] == b'0' {
        return None;
    }
    key.parse().ok()
}

impl Object {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            keys: Vec::with_capacity(cap),
            values: Vec::with_capacity(cap),
            index: FastHashMap::with_capacity_and_hasher(cap, fast_hasher()),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Position of the entry whose effective key is `key`.
    pub fn position(&self, key: &str) -> Option<usize> {
        if let Some(&pos) = self.index.get(key) {
            return Some(pos);
        }
        let pos = parse_position(key)?;
        match self.keys.get(pos) {
            Some(None) => Some(pos),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.position(key).map(|pos| &self.values[pos])
    }

    pub fn get_index(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    pub fn key_at(&self, idx: usize) -> Option<Cow<'_, str>> {
        match self.keys.get(idx)? {
            Some(k) => Some(Cow::Borrowed(k)),
            None => Some(Cow::Owned(idx.to_string())),
        }
    }

    /// Overwrites the entry in place if the key exists, otherwise appends.
    pub fn set(&mut self, key: &str, value: Value) {
        if let Some(pos) = self.position(key) {
            self.values[pos] = value;
            return;
        }
        let key: Arc<str> = Arc::from(key);
        self.index.insert(key.clone(), self.values.len());
        self.keys.push(Some(key));
        self.values.push(value);
    }

    /// Appends an unnamed entry and returns the new length.
    pub fn push(&mut self, value: Value) -> usize {
        self.keys.push(None);
        self.values.push(value);
        self.values.len()
    }

    /// Writes by position. Gaps up to `idx` are filled with `Nil`; a gap
    /// wider than `MAX_INDEX_GAP` is refused and leaves the object untouched.
    pub fn set_index(&mut self, idx: usize, value: Value) -> bool {
        if idx < self.values.len() {
            self.values[idx] = value;
            return true;
        }
        if idx - self.values.len() > MAX_INDEX_GAP {
            return false;
        }
        let gap = idx - self.values.len();
        self.keys.reserve(gap + 1);
        self.values.reserve(gap + 1);
        while self.values.len() < idx {
            self.push(Value::Nil);
        }
        self.push(value);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (Cow<'_, str>, &Value)> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, v)| match &self.keys[i] {
                Some(k) => (Cow::Borrowed(&**k), v),
                None => (Cow::Owned(i.to_string()), v),
            })
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

// ============================================================================
// Shared handle
// ============================================================================

struct ObjectCell {
    id: ObjectId,
    data: RwLock<Object>,
}

impl Drop for ObjectCell {
    fn drop(&mut self) {
        heap::release_object();
    }
}

/// Shared handle to a heap object. Clones alias the same container.
#[derive(Clone)]
pub struct ObjectRef(Arc<ObjectCell>);

impl ObjectRef {
    pub fn new(obj: Object) -> Self {
        let id = heap::track_object();
        ObjectRef(Arc::new(ObjectCell {
            id,
            data: RwLock::new(obj),
        }))
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.0.id
    }

    #[inline]
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// A writer that panicked cannot leave an entry half-written (keys and
    /// values are pushed back to back), so a poisoned lock is still usable.
    pub fn read(&self) -> RwLockReadGuard<'_, Object> {
        self.0.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Object> {
        self.0.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn get(&self, key: &str) -> Value {
        self.read().get(key).cloned().unwrap_or_default()
    }

    pub fn get_index(&self, idx: usize) -> Value {
        self.read().get_index(idx).cloned().unwrap_or_default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    pub fn set(&self, key: &str, value: Value) {
        self.write().set(key, value);
    }

    pub fn push(&self, value: Value) -> usize {
        self.write().push(value)
    }

    pub fn set_index(&self, idx: usize, value: Value) -> bool {
        self.write().set_index(idx, value)
    }

    /// Snapshot of the entries with their effective keys. The lock is released
    /// before returning, so callers may recurse into nested objects freely.
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.read()
            .iter()
            .map(|(k, v)| (k.into_owned(), v.clone()))
            .collect()
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef(id={})", self.id().0)
    }
}
