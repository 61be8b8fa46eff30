//! Core tasklist library (config, logging, task store).

pub mod config;
pub mod logging;
pub mod store;

pub use tasklist_types::{TaskId, TaskPayload, TaskRef};
