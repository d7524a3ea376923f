//! Completion engine - orchestrates the completion flow
//!
//! Ties together the components: word splitting, the FSM, context
//! determination and candidate fetching.

use tracing::debug;

use super::context::CompletionContext;
use super::fsm::CompletionState;
use super::paths::PathCompleter;
use super::provider::CandidateProvider;
use super::token_stream::CommandLine;
use crate::error::Result;
use crate::schema::SchemaProvider;

/// Main completion engine
pub struct CompletionEngine {
    provider: CandidateProvider,
}

impl CompletionEngine {
    /// Create a new completion engine
    ///
    /// # Arguments
    /// * `schema` - Schema of the target tool
    /// * `paths` - Filesystem path completion
    pub fn new(schema: Box<dyn SchemaProvider>, paths: Box<dyn PathCompleter>) -> Self {
        Self {
            provider: CandidateProvider::new(schema, paths),
        }
    }

    /// Complete `line` with the cursor at `cursor` (a character index).
    ///
    /// Candidates are returned in display order. Any failure to reach the
    /// target tool fails the whole request.
    pub fn complete(&mut self, line: &str, cursor: usize) -> Result<Vec<String>> {
        let context = Self::context(line, cursor);
        debug!("completion context: {:?}", context);

        let candidates = self.provider.candidates(&context)?;
        debug!("{} candidates", candidates.len());
        Ok(candidates)
    }

    /// Classify the word under the cursor
    pub fn context(line: &str, cursor: usize) -> CompletionContext {
        let line = CommandLine::parse(line, cursor);
        CompletionState::run(line.words_before_cursor()).to_context(&line)
    }
}
