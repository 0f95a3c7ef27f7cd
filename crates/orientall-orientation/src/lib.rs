//! Device orientation for OrientAll
//!
//! Classifies platform orientation readings into discrete modes and picks
//! the tool shown for each mode.

pub mod classify;
pub mod mode;
pub mod monitor;

pub use classify::{classify, OrientationReading};
pub use mode::{OrientationMode, ParseModeError, Tool};
pub use monitor::OrientationMonitor;
