//! Completion context definitions
//!
//! A context names what kind of thing the word under the cursor is, and
//! carries the text that candidates must extend.

/// Represents the type of completion needed based on the current input state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionContext {
    /// Module identifiers, after `-h modules`
    Module { prefix: String },

    /// Filter names, after `-h links`
    LinkedFilter { prefix: String },

    /// Global property names, after `-h props`
    Property { prefix: String },

    /// Any other help query: a topic keyword or a `filter[.arg]`
    HelpTopic { prefix: String },

    /// Source URL or path, after `-i`/`-src` or inside `src=`
    InputEndpoint { prefix: String },

    /// Destination URL or path, after `-o`/`-dst` or inside `dst=`
    OutputEndpoint { prefix: String },

    /// Nothing typed yet: global flags and filter names
    Start,

    /// A word starting with `-`
    Flag { prefix: String },

    /// A `filter:opt=value:...` clause
    FilterClause {
        word: String,
        /// The closing quote of the word was added by the tokenizer
        quote_synthesized: bool,
    },
}

impl CompletionContext {
    pub fn module(prefix: impl Into<String>) -> Self {
        Self::Module {
            prefix: prefix.into(),
        }
    }

    pub fn linked_filter(prefix: impl Into<String>) -> Self {
        Self::LinkedFilter {
            prefix: prefix.into(),
        }
    }

    pub fn property(prefix: impl Into<String>) -> Self {
        Self::Property {
            prefix: prefix.into(),
        }
    }

    pub fn help_topic(prefix: impl Into<String>) -> Self {
        Self::HelpTopic {
            prefix: prefix.into(),
        }
    }

    pub fn input_endpoint(prefix: impl Into<String>) -> Self {
        Self::InputEndpoint {
            prefix: prefix.into(),
        }
    }

    pub fn output_endpoint(prefix: impl Into<String>) -> Self {
        Self::OutputEndpoint {
            prefix: prefix.into(),
        }
    }

    pub fn flag(prefix: impl Into<String>) -> Self {
        Self::Flag {
            prefix: prefix.into(),
        }
    }

    pub fn filter_clause(word: impl Into<String>, quote_synthesized: bool) -> Self {
        Self::FilterClause {
            word: word.into(),
            quote_synthesized,
        }
    }
}
