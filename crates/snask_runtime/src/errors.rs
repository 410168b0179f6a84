//! Common error message constants used throughout the runtime.

pub mod messages {
    pub const NOT_A_STRING: &str = "Not a string";
    pub const UNKNOWN_BUILTIN: &str = "Unknown builtin";
}
