//! Completion system for gpac command lines
//!
//! The system is built on a finite state machine over the words before the
//! cursor. It works on incomplete input and keeps no state between calls:
//! everything is re-derived from the line, the cursor and the schema.
//!
//! # Architecture
//!
//! - **CommandLine**: splits the line at the cursor into shell words
//! - **FSM**: determines the completion context from those words
//! - **Context**: what kind of thing is being typed
//! - **Provider**: fetches candidates from the schema and the filesystem
//! - **Engine**: orchestrates the entire completion flow
//!
//! # Examples
//!
//! ```no_run
//! use gpac_complete::completion::{CompletionEngine, FsPathCompleter};
//! use gpac_complete::schema::{GpacBinary, SchemaCache};
//!
//! let schema = SchemaCache::in_memory(Box::new(GpacBinary::new("gpac")));
//! let mut engine = CompletionEngine::new(Box::new(schema), Box::new(FsPathCompleter::new()));
//!
//! // Arguments of the inspect filter starting with "de"
//! let candidates = engine.complete("gpac inspect:de", 15)?;
//! # Ok::<(), gpac_complete::CompleterError>(())
//! ```

mod context;
mod engine;
mod filter_option;
mod fsm;
mod paths;
mod provider;
mod token_stream;


pub use context::CompletionContext;
pub use engine::CompletionEngine;
pub use paths::{FsPathCompleter, PathCompleter};
pub use provider::{GLOBAL_FLAGS, HELP_TOPICS};
pub use token_stream::{CommandLine, HELP_FLAGS};
