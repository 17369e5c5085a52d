//! Subcommand implementations.

pub mod audit;
pub mod execute;
pub mod plan;
