//! Completion inside a filter clause
//!
//! A clause looks like `inspect:deep:mode=pck:#Bitrate=5:frame`: the filter
//! name, then `:`-separated options. An option is `arg`, `arg=value`, a bare
//! enum literal standing for `arg=literal`, or a `#Prop=value` property
//! assignment. Only the last segment is being typed; the earlier ones decide
//! which arguments are already used.

use std::collections::HashSet;

use super::paths::PathCompleter;
use super::token_stream::count_unescaped_quotes;
use crate::error::Result;
use crate::schema::{ArgType, ArgumentSpec, EnumShorthand, SchemaProvider};

/// String argument whose values are also completed as paths
const SOURCE_ARGUMENT: &str = "src";

const BOOL_VALUES: [&str; 2] = ["true", "false"];

/// Split on `:` outside double quotes
pub(super) fn split_segments(word: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, c) in word.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => in_quotes = !in_quotes,
            ':' if !in_quotes => {
                segments.push(&word[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&word[start..]);
    segments
}

fn option_name(segment: &str) -> &str {
    segment.split_once('=').map_or(segment, |(name, _)| name)
}

/// Schema knowledge about one clause
struct Clause<'w> {
    filter: &'w str,
    options: Vec<&'w str>,
    args: Vec<ArgumentSpec>,
    shorthands: Vec<EnumShorthand>,
    /// Argument names and literals present in any option segment
    used: HashSet<String>,
}

impl<'w> Clause<'w> {
    fn new(
        filter: &'w str,
        options: Vec<&'w str>,
        args: Vec<ArgumentSpec>,
        shorthands: Vec<EnumShorthand>,
    ) -> Self {
        let mut used = HashSet::new();
        for segment in options.iter().filter(|s| !s.starts_with('#')) {
            let name = option_name(segment);
            if let Some(shorthand) = shorthands.iter().find(|s| s.value == name) {
                used.insert(shorthand.argument.clone());
            }
            used.insert(name.to_string());
        }

        Self {
            filter,
            options,
            args,
            shorthands,
            used,
        }
    }

    fn arg(&self, name: &str) -> Option<&ArgumentSpec> {
        self.args.iter().find(|a| a.name == name)
    }

    fn is_shorthand(&self, literal: &str) -> bool {
        self.shorthands.iter().any(|s| s.value == literal)
    }

    /// Argument names, then enum literals, not used anywhere in the clause
    fn unused_names(&self) -> impl Iterator<Item = &str> {
        let args = self
            .args
            .iter()
            .filter(|a| !self.used.contains(&a.name))
            .map(|a| a.name.as_str());
        let literals = self
            .shorthands
            .iter()
            .filter(|s| !self.used.contains(&s.value) && !self.used.contains(&s.argument))
            .map(|s| s.value.as_str());
        args.chain(literals)
    }

    fn unused_names_starting_with(&self, prefix: &str) -> Vec<String> {
        self.unused_names()
            .filter(|name| name.starts_with(prefix))
            .map(str::to_string)
            .collect()
    }
}

/// Completes the word under the cursor when it is a filter clause
pub(super) struct ClauseCompleter<'a> {
    schema: &'a mut dyn SchemaProvider,
    paths: &'a dyn PathCompleter,
    quote_synthesized: bool,
}

impl<'a> ClauseCompleter<'a> {
    pub(super) fn new(
        schema: &'a mut dyn SchemaProvider,
        paths: &'a dyn PathCompleter,
        quote_synthesized: bool,
    ) -> Self {
        Self {
            schema,
            paths,
            quote_synthesized,
        }
    }

    /// Candidates for `word`; empty when its first segment is not a filter
    pub(super) fn complete(&mut self, word: &str) -> Result<Vec<String>> {
        let segments = split_segments(word);
        let Some((&filter, options)) = segments.split_first() else {
            return Ok(Vec::new());
        };

        if !self.schema.filters()?.iter().any(|f| f == filter) {
            return Ok(Vec::new());
        }

        let args = self.schema.filter_args(filter)?;
        if options.is_empty() {
            let mut candidates = vec![format!("{word} ")];
            if !args.is_empty() {
                candidates.push(format!("{word}:"));
            }
            return Ok(candidates);
        }

        let shorthands = self.schema.enum_shorthands(filter)?;
        let clause = Clause::new(filter, options.to_vec(), args, shorthands);
        self.complete_last_option(&clause)
    }

    fn complete_last_option(&mut self, clause: &Clause<'_>) -> Result<Vec<String>> {
        let (&last, earlier) = match clause.options.split_last() {
            Some(split) => split,
            None => return Ok(Vec::new()),
        };

        // Word ends in ':'
        if last.is_empty() {
            return Ok(clause.unused_names().map(str::to_string).collect());
        }

        if let Some(property) = last.strip_prefix('#') {
            return self.property(property, earlier);
        }

        let mut candidates = if clause.is_shorthand(last) {
            vec![format!("{last} "), format!("{last}:")]
        } else {
            match last.split_once('=') {
                Some((name, value)) => {
                    return match clause.arg(name) {
                        Some(spec) => self.value(clause.filter, spec, value),
                        None => Ok(Vec::new()),
                    };
                }
                None => match clause.arg(last) {
                    Some(spec) if spec.kind == ArgType::Bool => {
                        vec![format!("{last}:"), format!("{last} "), format!("{last}=")]
                    }
                    Some(_) => vec![format!("{last}=")],
                    None => {
                        // A prefix naming a single boolean is as good as the
                        // full name: offer its toggles right away.
                        let matches = clause.unused_names_starting_with(last);
                        if let [only] = matches.as_slice() {
                            if clause.arg(only).is_some_and(|a| a.kind == ArgType::Bool) {
                                return Ok(vec![format!("{only}:"), format!("{only} ")]);
                            }
                        }
                        Vec::new()
                    }
                },
            }
        };

        candidates.extend(clause.unused_names_starting_with(last));
        Ok(candidates)
    }

    /// `#Prop` or `#Prop=value`
    fn property(&mut self, text: &str, earlier: &[&str]) -> Result<Vec<String>> {
        if let Some((_, value)) = text.split_once('=') {
            return Ok(scalar_candidates(value));
        }

        let referenced: HashSet<&str> = earlier
            .iter()
            .filter_map(|s| s.strip_prefix('#'))
            .map(option_name)
            .collect();

        Ok(self
            .schema
            .props()?
            .into_iter()
            .filter(|p| p.starts_with(text) && !referenced.contains(p.as_str()))
            .map(|p| format!("#{p}"))
            .collect())
    }

    /// Candidates for the text after `arg=`
    fn value(&mut self, filter: &str, spec: &ArgumentSpec, value: &str) -> Result<Vec<String>> {
        let detail = self.schema.argument(filter, &spec.name)?;
        let kind = detail.kind.unwrap_or_else(|| spec.kind.clone());

        let candidates = match kind {
            ArgType::Bool => enum_candidates(&BOOL_VALUES, value),
            ArgType::Enum => enum_candidates(&detail.values, value),
            ArgType::Strl => list_candidates(value),
            ArgType::Str | ArgType::Cstr => {
                let mut candidates = string_candidates(value, self.quote_synthesized);
                if spec.name == SOURCE_ARGUMENT {
                    candidates.extend(self.paths.complete(value.trim_matches('"'), false));
                }
                candidates
            }
            _ => scalar_candidates(value),
        };
        Ok(candidates)
    }
}

/// Literals extending `value`; an exact match is closed with a space and
/// may be continued with `:`
fn enum_candidates<S: AsRef<str>>(values: &[S], value: &str) -> Vec<String> {
    let mut candidates: Vec<String> = values
        .iter()
        .map(AsRef::as_ref)
        .filter(|v| v.starts_with(value))
        .map(|v| {
            if v == value {
                format!("{v} ")
            } else {
                v.to_string()
            }
        })
        .collect();

    if values.iter().any(|v| v.as_ref() == value) {
        candidates.push(format!("{value}:"));
    }
    candidates
}

/// Comma-separated list item
fn list_candidates(value: &str) -> Vec<String> {
    if value.is_empty() {
        Vec::new()
    } else if value.ends_with(',') {
        vec![value.to_string()]
    } else {
        vec![
            value.to_string(),
            format!("{value},"),
            format!("{value}:"),
        ]
    }
}

/// Quoted string; the quote is closed exactly once
fn string_candidates(value: &str, quote_synthesized: bool) -> Vec<String> {
    if quote_synthesized {
        let open = value.strip_suffix('"').unwrap_or(value);
        return vec![open.to_string(), format!("{value}:"), format!("{value} ")];
    }

    // Quotes already balanced by the user: only terminate.
    if count_unescaped_quotes(value) > 0 {
        return vec![format!("{value}:"), format!("{value} ")];
    }

    vec![
        format!("\"{value}\":"),
        format!("\"{value}\" "),
        format!("\"{value}"),
    ]
}

/// Numbers and other scalars are accepted as typed
fn scalar_candidates(value: &str) -> Vec<String> {
    if value.is_empty() {
        Vec::new()
    } else {
        vec![format!("{value}:"), format!("{value} ")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_segments() {
        assert_eq!(split_segments("inspect"), ["inspect"]);
        assert_eq!(split_segments("inspect:"), ["inspect", ""]);
        assert_eq!(split_segments("inspect:deep:mode=pck"), ["inspect", "deep", "mode=pck"]);
        assert_eq!(
            split_segments(r#"inspect:fmt="a:b":deep"#),
            ["inspect", r#"fmt="a:b""#, "deep"]
        );
        assert_eq!(split_segments(r"fin:src=a\:b"), ["fin", r"src=a\:b"]);
    }

    #[test]
    fn test_enum_candidates() {
        let values = ["raw", "pck", "frame", "blk"];
        assert_eq!(enum_candidates(&values, ""), ["raw", "pck", "frame", "blk"]);
        assert_eq!(enum_candidates(&values, "r"), ["raw"]);
        assert_eq!(enum_candidates(&values, "raw"), ["raw ", "raw:"]);
        assert!(enum_candidates(&values, "x").is_empty());
    }

    #[test]
    fn test_list_candidates() {
        assert!(list_candidates("").is_empty());
        assert_eq!(list_candidates("a,b,"), ["a,b,"]);
        assert_eq!(list_candidates("a,b"), ["a,b", "a,b,", "a,b:"]);
    }

    #[test]
    fn test_string_candidates_close_quote_once() {
        assert_eq!(string_candidates("", false), [r#""":"#, r#""" "#, r#"""#]);
        assert_eq!(
            string_candidates("format", false),
            [r#""format":"#, r#""format" "#, r#""format"#]
        );
        assert_eq!(
            string_candidates(r#""format ins""#, true),
            [r#""format ins"#, r#""format ins":"#, r#""format ins" "#]
        );
        assert_eq!(
            string_candidates(r#""done""#, false),
            [r#""done":"#, r#""done" "#]
        );
    }

    #[test]
    fn test_string_candidates_keep_balanced_quotes() {
        assert_eq!(
            string_candidates(r#""a b"c"#, false),
            [r#""a b"c:"#, r#""a b"c "#]
        );
        assert_eq!(
            string_candidates(r#"x"y z""#, false),
            [r#"x"y z":"#, r#"x"y z" "#]
        );
        assert_eq!(
            string_candidates(r#"a"b""#, true),
            [r#"a"b"#, r#"a"b":"#, r#"a"b" "#]
        );
    }

    #[test]
    fn test_scalar_candidates() {
        assert!(scalar_candidates("").is_empty());
        assert_eq!(scalar_candidates("1.5"), ["1.5:", "1.5 "]);
    }
}
