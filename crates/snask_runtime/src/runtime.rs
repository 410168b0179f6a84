//! The runtime object native code calls into.

use crate::builtins_registry::{BuiltinProvider, BuiltinRegistry, BuiltinTable, StdBuiltinProvider};
use crate::config::RuntimeConfig;
use crate::dispatch::Dispatcher;
use crate::errors::messages::UNKNOWN_BUILTIN;
use crate::thread::ThreadTable;
use crate::Value;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

pub struct Runtime {
    config: RuntimeConfig,
    dispatcher: Arc<Dispatcher>,
    threads: ThreadTable,
    builtins: BuiltinTable,
}

impl Runtime {
    pub fn new() -> Self {
        Self::with_dispatcher(Arc::new(Dispatcher::new()))
    }

    /// The dispatcher is fixed from here on; register script functions first.
    pub fn with_dispatcher(dispatcher: Arc<Dispatcher>) -> Self {
        let mut rt = Self {
            config: RuntimeConfig::default(),
            dispatcher,
            threads: ThreadTable::new(),
            builtins: BuiltinTable::default(),
        };
        rt.install(&StdBuiltinProvider);
        rt
    }

    pub fn with_config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn install(&mut self, provider: &dyn BuiltinProvider) {
        let mut registry = BuiltinRegistry::new();
        provider.install(&mut registry);
        registry.install_into(&mut self.builtins);
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn threads(&self) -> &ThreadTable {
        &self.threads
    }

    pub fn has_builtin(&self, name: &str) -> bool {
        self.builtins.contains_key(name)
    }

    pub fn builtin_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.builtins.keys().cloned().collect();
        names.sort();
        names
    }

    /// Calls a native library function. Unknown names and wrong argument
    /// counts are host errors; type mismatches come back as `Nil`/`false`.
    pub fn call_builtin(&mut self, name: &str, args: &[Value]) -> Result<Value, String> {
        let Some(fun) = self.builtins.get(name).copied() else {
            return Err(format!("{}: {}", UNKNOWN_BUILTIN, name));
        };
        fun(self, args)
    }

    /// Dynamic dispatch into a script function (`f_<name>`).
    pub fn call_function(&self, name: &str, args: &[Value]) -> Value {
        self.dispatcher.call(name, args)
    }

    pub fn clock_unix_secs(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
