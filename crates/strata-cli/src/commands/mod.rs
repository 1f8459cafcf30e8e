//! Subcommand implementations.

pub mod info;
pub mod slice;
