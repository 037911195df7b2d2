//! Subcommand implementations.

pub mod contains;
pub mod create;
pub mod extract;
pub mod info;
pub mod list;
