//! # coursemap CLI
//!
//! The binary is thin: argument parsing, dispatch and terminal output live in
//! `cli/`, and this file only calls `cli::run()` and turns an error into an
//! exit code. Everything the commands actually do goes through
//! [`coursemap::api::CourseMapApi`].
//!
//! ```text
//! cli/setup.rs     clap definitions and grouped help
//! cli/commands.rs  context wiring and per-command handlers
//! cli/print.rs     messages, course outline, config listing
//! ```

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
