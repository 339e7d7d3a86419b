//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of a cache store.
//!
//! # Tasks
//! - Expiration sweep: reclaims expired records in insertion order

mod sweep;

pub(crate) use sweep::spawn_sweep_task;
