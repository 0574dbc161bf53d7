//! Logging setup.

mod logging;

pub use logging::{init_logging, LoggingConfig, LoggingError};
