//! Execution Engine Module
//!
//! Replays a written journal against the filesystem, one entry at a time
//! in journal order.

pub mod executor;

pub use executor::*;
