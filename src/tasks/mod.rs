//! Background Tasks Module
//!
//! Contains background tasks that run periodically during gateway operation.
//!
//! # Tasks
//! - Expired-entry purge: sweeps stale entries out of memory and disk

mod purge;

pub use purge::spawn_purge_task;
