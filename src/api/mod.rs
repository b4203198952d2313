//! Public facade.

pub mod hal;
pub mod types;

pub use hal::Hal;
pub use types::{HalConfig, HalError, HalResult};
