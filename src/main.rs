//! gpac-complete - tab completion for gpac
//!
//! Invoked by the shell on every completion request with the cursor
//! position and the line being edited; prints one candidate per line.
//!
//! # Usage
//!
//! ```bash
//! # Install the hook
//! eval "$(gpac-complete init bash)"
//!
//! # What the hook runs
//! gpac-complete complete 15 "gpac inspect:de"
//! ```

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use gpac_complete::cli::CliInterface;
use gpac_complete::error::Result;

/// Application entry point
fn main() {
    // A failed completion prints nothing on stdout, so the shell offers
    // nothing instead of garbage.
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments
/// 2. Load configuration
/// 3. Initialize logging
/// 4. Run the subcommand
fn run() -> Result<()> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);

    cli.handle_command()
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Initialize logging system based on configuration
///
/// # Arguments
/// * `cli` - CLI interface with the effective logging settings
fn initialize_logging(cli: &CliInterface) {
    let logging = &cli.config().logging;

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(logging.level.to_tracing_level())
        .with_target(false);

    let file = logging
        .file_path
        .as_deref()
        .and_then(|path| match open_log_file(path) {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!("Warning: cannot open log file {}: {}", path.display(), e);
                None
            }
        });

    match (file, logging.timestamps) {
        (Some(file), true) => subscriber
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        (Some(file), false) => subscriber
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .without_time()
            .init(),
        (None, true) => subscriber.with_writer(io::stderr).init(),
        (None, false) => subscriber.with_writer(io::stderr).without_time().init(),
    }
}
