//! Utility modules

pub mod error;
pub mod logging;

pub use error::{ProcessError, Result, SimError};
pub use logging::setup_logging;
