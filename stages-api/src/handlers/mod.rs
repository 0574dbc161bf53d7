//! Request handlers.

mod list_stages;

pub use list_stages::{list_stages, StageListHandler};
