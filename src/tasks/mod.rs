//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of a cache.
//!
//! # Tasks
//! - Expiry sweeper: removes expired entries on a fixed cadence

mod sweeper;

pub use sweeper::spawn_sweeper;
