//! Runtime configuration.

use crate::json::DEFAULT_MAX_DEPTH;

/// Runtime configuration options.
#[derive(Clone, Copy, Debug)]
pub struct RuntimeConfig {
    /// Nesting limit applied by `json_parse` and friends.
    pub json_max_depth: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            json_max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
