//! gpac command line completion library
//!
//! This library provides the completion engine behind the `gpac-complete`
//! binary. It can also be embedded in other tools that need to complete
//! gpac command lines.
//!
//! # Modules
//!
//! - `cli`: Command-line interface and argument parsing
//! - `completion`: Line splitting, context detection and candidates
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `schema`: gpac's filters, arguments and protocols, cached per version
//!
//! # Example
//!
//! ```no_run
//! use gpac_complete::completion::{CompletionEngine, FsPathCompleter};
//! use gpac_complete::schema::{GpacBinary, SchemaCache};
//!
//! fn main() -> gpac_complete::Result<()> {
//!     let adapter = Box::new(GpacBinary::new("gpac"));
//!     let schema = SchemaCache::open("/tmp/gpac_autocomplete.json", adapter)?;
//!     let mut engine = CompletionEngine::new(Box::new(schema), Box::new(FsPathCompleter::new()));
//!
//!     for candidate in engine.complete("gpac -i ", 8)? {
//!         println!("{candidate}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod schema;

// Re-export commonly used types
pub use completion::CompletionEngine;
pub use config::Config;
pub use error::{CompleterError, Result};
pub use schema::{SchemaCache, SchemaProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
