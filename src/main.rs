//! pie-api entry point
//!
//! Delegates to the CLI module, prints errors to stderr and exits non-zero
//! on failure.

use pie_api::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
