//! # CLI Behavior
//!
//! One possible UI client for coursemap. This is the only place that knows
//! about terminal I/O, exit codes and output formatting.
//!
//! ## Addressing
//!
//! Everything is addressed by the labels the report shows:
//!
//! - outcomes by letter: `coursemap outcome set B "Apply Y"`
//! - modules and items by 1-based number: `coursemap item rm 2 resource 1`
//! - objectives by `module.objective`: `coursemap objective rm 2.3`
//!
//! Labels are positional, so they shift after a removal. `coursemap show`
//! prints the current ones.
//!
//! ## Files
//!
//! The course lives in one JSON file (`--file`, else `course_file` from the
//! config). The config directory comes from `--config-dir`, then
//! `COURSEMAP_CONFIG_DIR`, then the platform config directory.
//!
//! ## Module Structure
//!
//! - `commands`: context setup and per-command handlers
//! - `print`: output formatting
//! - `setup`: argument parsing via clap, help text

mod commands;
mod print;
pub mod setup;

pub use commands::run;
