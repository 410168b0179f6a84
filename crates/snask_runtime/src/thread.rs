//! Native OS threads that run exactly one dispatch call.
//!
//! Handles are plain numbers. There is no cancellation and no return-value
//! channel: `join` and `detach` only report whether the handle was known (and,
//! for `join`, whether the thread finished without panicking).

use crate::dispatch::Dispatcher;
use ahash::RandomState;
use hashbrown::HashMap;
use snask_core::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

#[derive(Default)]
pub struct ThreadTable {
    next_id: AtomicU64,
    handles: Mutex<HashMap<u64, JoinHandle<()>, RandomState>>,
}

impl ThreadTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a thread calling `name(arg)`. Returns the handle, or `Nil` when
    /// the OS refuses to create a thread.
    pub fn spawn(&self, dispatcher: Arc<Dispatcher>, name: &str, arg: Value) -> Value {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let fname = name.to_string();
        let spawned = std::thread::Builder::new()
            .name(format!("snask-{}", name))
            .spawn(move || {
                dispatcher.call(&fname, &[arg]);
            });
        match spawned {
            Ok(handle) => {
                self.lock().insert(id, handle);
                Value::from_f64(id as f64)
            }
            Err(e) => {
                tracing::warn!(name, error = %e, "thread spawn failed");
                Value::Nil
            }
        }
    }

    pub fn join(&self, handle: &Value) -> bool {
        let Some(h) = self.take(handle) else {
            return false;
        };
        h.join().is_ok()
    }

    /// Forgets the handle; the thread keeps running to completion.
    pub fn detach(&self, handle: &Value) -> bool {
        self.take(handle).is_some()
    }

    pub fn active(&self) -> usize {
        self.lock().len()
    }

    fn take(&self, handle: &Value) -> Option<JoinHandle<()>> {
        let id = handle.as_index()? as u64;
        self.lock().remove(&id)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<u64, JoinHandle<()>, RandomState>> {
        self.handles.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
