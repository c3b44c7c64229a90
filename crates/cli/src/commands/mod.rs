//! Subcommand implementations.

pub mod migrate;
pub mod qr;
pub mod report;
