//! Scrapers for gpac's help output
//!
//! gpac highlights names with ANSI colors (green for filters, modules,
//! arguments and properties, yellow for enum values). These functions pull
//! the names back out. Text that does not have the expected shape yields
//! empty results, never an error.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use super::{ArgType, ArgumentDetail, ArgumentSpec, Protocol};

static VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"version\s([\dA-Za-z.\-]+)").expect("valid regex"));

static FILTER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[32m([A-Za-z0-9]*):\x1b\[0m").expect("valid regex"));

static MODULE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[32m([A-Za-z0-9._]*):\x1b\[0m").expect("valid regex"));

static ARG_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)\s*\((\w+)").expect("valid regex"));

static ENUM_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[33m([A-Za-z0-9]+)\x1b\[0m:").expect("valid regex"));

static PROTOCOL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+):(?:\s*in\s*\(([^)]*)\))?(?:\s*out\s*\(([^)]*)\))?").expect("valid regex")
});

static PROP_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[32m([A-Z][A-Za-z]*)\x1b\[0m").expect("valid regex"));

/// Collect the first capture group of every match, skipping empty names
fn captures(re: &Regex, text: &str) -> Vec<String> {
    re.captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn warn_if_empty<T>(what: &str, items: &[T], text: &str) {
    if items.is_empty() {
        warn!(
            "no {what} found in tool output ({} bytes), treating as empty",
            text.len()
        );
    }
}

pub(crate) fn version(text: &str) -> Option<String> {
    let version = VERSION
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());
    if version.is_none() {
        warn!("could not find a version string in tool output");
    }
    version
}

pub(crate) fn filters(text: &str) -> Vec<String> {
    let names = captures(&FILTER_NAME, text);
    warn_if_empty("filters", &names, text);
    names
}

pub(crate) fn modules(text: &str) -> Vec<String> {
    let names = captures(&MODULE_NAME, text);
    warn_if_empty("modules", &names, text);
    names
}

/// Parse `gpac -h <filter>.* -logs=ncl`: one `name (type, ...)` header per
/// argument, description lines indented or dashed.
pub(crate) fn filter_args(text: &str) -> Vec<ArgumentSpec> {
    text.trim_matches(|c| c == '\n' || c == ' ')
        .lines()
        .filter(|line| {
            line.chars()
                .next()
                .is_some_and(|c| !matches!(c, ' ' | '-' | '\t'))
        })
        .filter_map(|line| ARG_LINE.captures(line))
        .map(|c| ArgumentSpec::new(&c[1], ArgType::parse(&c[2])))
        .collect()
}

/// Parse `gpac -h <filter>.<arg>`: the type sits in parentheses right after
/// the highlighted argument name; enum values are listed in yellow.
pub(crate) fn argument(text: &str, arg: &str) -> ArgumentDetail {
    let pattern = format!(
        r"^\x1b\[32m{}\x1b\[0m\s*\(([^,)]+)[,)]",
        regex::escape(arg)
    );
    let Ok(header) = Regex::new(&pattern) else {
        return ArgumentDetail::unknown();
    };

    let Some(kind) = header
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| ArgType::parse(m.as_str()))
    else {
        warn!("no type found for argument '{arg}' in tool output");
        return ArgumentDetail::unknown();
    };

    let values = if kind == ArgType::Enum {
        captures(&ENUM_VALUE, text)
    } else {
        Vec::new()
    };
    ArgumentDetail::new(kind, values)
}

/// Parse `gpac -ha protocols -logs=ncl`: a header line followed by
/// `proto: in (f1, f2) out (f3)` lines.
pub(crate) fn protocols(text: &str) -> Vec<Protocol> {
    let split = |group: Option<regex::Match<'_>>| -> Vec<String> {
        group
            .map(|m| m.as_str())
            .filter(|s| !s.is_empty())
            .map(|s| s.split(", ").map(str::to_string).collect())
            .unwrap_or_default()
    };

    let protocols: Vec<Protocol> = text
        .trim_matches('\n')
        .lines()
        .skip(1)
        .filter_map(|line| PROTOCOL_LINE.captures(line))
        .map(|c| Protocol {
            name: c[1].to_string(),
            input: split(c.get(2)),
            output: split(c.get(3)),
        })
        .collect();
    warn_if_empty("protocols", &protocols, text);
    protocols
}

pub(crate) fn props(text: &str) -> Vec<String> {
    let names = captures(&PROP_NAME, text);
    warn_if_empty("properties", &names, text);
    names
}
