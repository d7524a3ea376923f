//! Candidate provider for completion suggestions
//!
//! Turns a [`CompletionContext`] into candidate strings using the schema
//! and the filesystem. Candidates keep the tool's own ordering; the invoking
//! shell does its own sorting if it wants to.

use super::context::CompletionContext;
use super::filter_option::ClauseCompleter;
use super::paths::PathCompleter;
use crate::error::Result;
use crate::schema::SchemaProvider;

/// Global flags offered for an empty word or a lone `-`
pub const GLOBAL_FLAGS: [&str; 10] = [
    "-h", "-help", "-netcap=", "-graph", "-stats", "-src", "-i", "-logs", "-dst", "-o",
];

/// Flags matched against a partial `-...` word
const PREFIX_FLAGS: [&str; 11] = [
    "-h", "-hx", "-help", "-netcap=", "-graph", "-stats", "-src", "-i", "-logs", "-dst", "-o",
];

/// Keywords accepted after a help flag
pub const HELP_TOPICS: [&str; 19] = [
    "doc", "alias", "log", "core", "cfg", "net", "prompt", "modules", "module", "creds",
    "filters", "codecs", "formats", "protocols", "props", "colors", "layouts", "links", "defer",
];

/// Keep the items starting with `prefix`, in their original order
pub fn filter_by_prefix<S: AsRef<str>>(items: &[S], prefix: &str) -> Vec<String> {
    items
        .iter()
        .map(AsRef::as_ref)
        .filter(|item| item.starts_with(prefix))
        .map(str::to_string)
        .collect()
}

/// Items closed with a space, plus a lone space standing for "nothing more"
fn closed_with_space(items: &[String], prefix: &str) -> Vec<String> {
    items
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(""))
        .filter(|item| item.starts_with(prefix))
        .map(|item| format!("{item} "))
        .collect()
}

/// Fetches candidates from the schema and the filesystem
pub struct CandidateProvider {
    schema: Box<dyn SchemaProvider>,
    paths: Box<dyn PathCompleter>,
}

impl CandidateProvider {
    /// Create a new candidate provider
    ///
    /// # Arguments
    /// * `schema` - Source of filters, arguments, protocols and properties
    /// * `paths` - Source of filesystem paths for endpoints
    pub fn new(schema: Box<dyn SchemaProvider>, paths: Box<dyn PathCompleter>) -> Self {
        Self { schema, paths }
    }

    /// Fetch candidates based on completion context
    pub fn candidates(&mut self, context: &CompletionContext) -> Result<Vec<String>> {
        match context {
            CompletionContext::Module { prefix } => {
                let modules = self.schema.modules()?;
                Ok(closed_with_space(&modules, prefix))
            }
            CompletionContext::LinkedFilter { prefix } => {
                let filters = self.schema.filters()?;
                Ok(closed_with_space(&filters, prefix))
            }
            CompletionContext::Property { prefix } => {
                let props = self.schema.props()?;
                Ok(closed_with_space(&props, prefix))
            }
            CompletionContext::HelpTopic { prefix } => self.help_topics(prefix),
            CompletionContext::InputEndpoint { prefix } => self.endpoints(prefix, true),
            CompletionContext::OutputEndpoint { prefix } => self.endpoints(prefix, false),
            CompletionContext::Start => {
                let mut candidates: Vec<String> =
                    GLOBAL_FLAGS.iter().map(|f| f.to_string()).collect();
                candidates.extend(self.schema.filters()?);
                Ok(candidates)
            }
            CompletionContext::Flag { prefix } if prefix == "-" => {
                Ok(GLOBAL_FLAGS.iter().map(|f| f.to_string()).collect())
            }
            CompletionContext::Flag { prefix } => Ok(filter_by_prefix(&PREFIX_FLAGS, prefix)),
            CompletionContext::FilterClause {
                word,
                quote_synthesized,
            } => {
                let candidates = ClauseCompleter::new(
                    self.schema.as_mut(),
                    self.paths.as_ref(),
                    *quote_synthesized,
                )
                .complete(word)?;

                if candidates.is_empty() {
                    let filters = self.schema.filters()?;
                    return Ok(filter_by_prefix(&filters, word));
                }
                Ok(candidates)
            }
        }
    }

    /// `-h <word>`: per-filter help when the word names a filter, otherwise
    /// topic keywords and filter names
    fn help_topics(&mut self, prefix: &str) -> Result<Vec<String>> {
        let filters = self.schema.filters()?;
        let head = prefix.split('.').next().unwrap_or(prefix);

        if filters.iter().any(|f| f == head) {
            let candidates = self.filter_help(head, prefix)?;
            if !candidates.is_empty() {
                return Ok(candidates);
            }
        }

        let mut candidates: Vec<String> = filter_by_prefix(&HELP_TOPICS, prefix)
            .into_iter()
            .map(|topic| format!("{topic} "))
            .collect();
        candidates.extend(filter_by_prefix(&filters, prefix));
        Ok(candidates)
    }

    /// `-h filter` or `-h filter.arg`
    fn filter_help(&mut self, filter: &str, word: &str) -> Result<Vec<String>> {
        let args = self.schema.filter_args(filter)?;

        if word == filter {
            let mut candidates = vec![format!("{filter} ")];
            if !args.is_empty() {
                candidates.push(format!("{filter}."));
            }
            return Ok(candidates);
        }

        let Some(rest) = word.strip_prefix(filter).and_then(|r| r.strip_prefix('.')) else {
            return Ok(Vec::new());
        };
        Ok(args
            .iter()
            .filter(|a| a.name.starts_with(rest))
            .map(|a| format!("{filter}.{} ", a.name))
            .collect())
    }

    /// `scheme://` for every protocol able to read (or write), then paths
    fn endpoints(&mut self, prefix: &str, input: bool) -> Result<Vec<String>> {
        let mut candidates: Vec<String> = self
            .schema
            .protocols()?
            .into_iter()
            .filter(|p| if input { p.can_read() } else { p.can_write() })
            .map(|p| format!("{}://", p.name))
            .filter(|scheme| scheme.starts_with(prefix))
            .collect();

        candidates.extend(self.paths.complete(prefix, false));
        Ok(candidates)
    }
}
