//! Error handling module for gpac-complete.
//!
//! The taxonomy follows what a completion request can run into:
//! - adapter failures (tool missing or failing) are hard errors
//! - configuration problems surface at startup
//! - malformed tool output and unreadable cache files are *not* errors;
//!   they are logged and degrade to empty data
//!
//! # Example
//!
//! ```rust
//! use gpac_complete::error::{AdapterError, CompleterError, Result};
//!
//! fn query() -> Result<()> {
//!     Err(AdapterError::Spawn {
//!         command: "gpac -h filters".to_string(),
//!         reason: "not found".to_string(),
//!     }
//!     .into())
//! }
//!
//! assert!(matches!(query(), Err(CompleterError::Adapter(_))));
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{AdapterError, CompleterError, ConfigError, Result};
