//! Entry point for the `stairway` command-line interface.
#![forbid(unsafe_code)]

use tracing_subscriber::EnvFilter;

#[expect(clippy::print_stderr, reason = "fatal errors are reported on stderr")]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    if let Err(err) = stairway_cli::run() {
        eprintln!("stairway: {err}");
        std::process::exit(1);
    }
}
