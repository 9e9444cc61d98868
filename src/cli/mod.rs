//! CLI module
//!
//! Command-line interface over the paced executor.
//!
//! # Commands
//!
//! - `get` - One paced GET
//! - `post` - One paced POST
//! - `delete` - One paced DELETE
//! - `pages` - Walk a cursor-paginated collection

mod commands;
mod runner;

pub use commands::{parse_key_val, Cli, Commands, OutputFormat};
pub use runner::Runner;
