//! MCU capability interface and transports.
//!
//! The binary wire protocol to the MCU lives behind the privileged control
//! tool; this module only models the capability surface and translates the
//! leading result code of each response into the error taxonomy.

pub mod ctl_tool;
pub mod error;
pub mod mcu;
pub mod mock;

pub use ctl_tool::CtlToolMcu;
pub use error::{McuError, McuResult};
pub use mcu::McuInterface;
pub use mock::MockMcu;
