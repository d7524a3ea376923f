//! Filesystem path completion
//!
//! Candidates follow the shell's conventions: directories end in `/`, other
//! entries in a space, embedded spaces are backslash-escaped and a leading
//! `~` is expanded for the lookup but kept in the result.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

/// Source of path candidates
pub trait PathCompleter {
    /// Entries whose path starts with `prefix`; `only_dirs` skips files
    fn complete(&self, prefix: &str, only_dirs: bool) -> Vec<String>;
}

/// Path completion against the real filesystem
#[derive(Debug, Clone)]
pub struct FsPathCompleter {
    home: Option<PathBuf>,
}

impl Default for FsPathCompleter {
    fn default() -> Self {
        Self::new()
    }
}

impl FsPathCompleter {
    pub fn new() -> Self {
        Self {
            home: dirs::home_dir(),
        }
    }

    /// Use `home` for `~` expansion instead of the user's home directory
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self {
            home: Some(home.into()),
        }
    }

    /// Expand a leading `~`; returns the expanded text and the home prefix
    /// to collapse back, if any
    fn expand_tilde(&self, prefix: &str) -> (String, Option<String>) {
        let Some(home) = self.home.as_ref().and_then(|h| h.to_str()) else {
            return (prefix.to_string(), None);
        };
        let home = home.trim_end_matches('/');

        match prefix.strip_prefix('~') {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => {
                (format!("{home}{rest}"), Some(home.to_string()))
            }
            _ => (prefix.to_string(), None),
        }
    }
}

impl PathCompleter for FsPathCompleter {
    fn complete(&self, prefix: &str, only_dirs: bool) -> Vec<String> {
        let unescaped = prefix.replace("\\ ", " ");
        let (expanded, home) = self.expand_tilde(&unescaped);

        // "~" alone lists the home directory itself.
        let expanded = if home.is_some() && unescaped == "~" {
            format!("{expanded}/")
        } else {
            expanded
        };

        let (dir, base) = match expanded.rfind('/') {
            Some(i) => expanded.split_at(i + 1),
            None => ("", expanded.as_str()),
        };

        let listing = if dir.is_empty() { "." } else { dir };
        let entries = match fs::read_dir(listing) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("cannot list {listing}: {e}");
                return Vec::new();
            }
        };

        let render = |name: &str, is_dir: bool| {
            let full = format!("{dir}{name}");
            let shown = match &home {
                Some(home) => format!("~{}", &full[home.len()..]),
                None => full,
            };
            let suffix = if is_dir { '/' } else { ' ' };
            format!("{}{suffix}", shown.replace(' ', "\\ "))
        };

        let mut candidates: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                if !name.starts_with(base) || (name.starts_with('.') && !base.starts_with('.')) {
                    return None;
                }

                let is_dir = entry.path().is_dir();
                if only_dirs && !is_dir {
                    return None;
                }
                Some(render(&name, is_dir))
            })
            .collect();

        // read_dir never yields the self and parent links.
        if base.starts_with('.') {
            candidates.extend(
                [".", ".."]
                    .into_iter()
                    .filter(|link| link.starts_with(base))
                    .map(|link| render(link, true)),
            );
        }

        candidates.sort();
        candidates
    }
}
