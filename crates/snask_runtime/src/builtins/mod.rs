pub(super) mod common;
pub(super) mod conversion;
pub(super) mod core;
pub(super) mod json;
pub(super) mod system;

pub use conversion::*;
pub use self::core::*;
pub use json::*;
pub use system::*;
