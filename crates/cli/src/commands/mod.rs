//! Subcommand implementations

pub mod batch;
pub mod convert;
pub mod formats;
pub mod info;
