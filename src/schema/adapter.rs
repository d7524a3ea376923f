//! Access to the target tool
//!
//! [`ToolAdapter`] is the seam between the schema cache and the outside
//! world. [`GpacBinary`] implements it by running gpac's help queries and
//! scraping their colored output; tests plug in an in-memory fake.

use std::process::{Command, Stdio};

use tracing::debug;

use super::scrape;
use super::{ArgumentDetail, ArgumentSpec, Protocol};
use crate::error::{AdapterError, Result};

/// Source of raw schema knowledge, one call per cached subfield.
///
/// Calls are expected to be idempotent for a fixed tool version. A failure to
/// reach the tool is an error; output the adapter cannot make sense of is
/// reported as empty data.
pub trait ToolAdapter {
    /// Version string of the live tool, if it prints one
    fn version(&self) -> Result<Option<String>>;

    fn filters(&self) -> Result<Vec<String>>;

    fn modules(&self) -> Result<Vec<String>>;

    fn filter_args(&self, filter: &str) -> Result<Vec<ArgumentSpec>>;

    fn argument(&self, filter: &str, arg: &str) -> Result<ArgumentDetail>;

    fn protocols(&self) -> Result<Vec<Protocol>>;

    fn props(&self) -> Result<Vec<String>>;
}

/// Adapter running the gpac binary
#[derive(Debug, Clone)]
pub struct GpacBinary {
    binary: String,
}

impl GpacBinary {
    /// Create an adapter for the given binary name or path
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Run the binary with `args` and return its decoded output.
    ///
    /// `merge_stderr` folds stderr into the returned text; otherwise stderr
    /// is discarded.
    fn run(&self, args: &[&str], merge_stderr: bool) -> Result<String> {
        let command_line = format!("{} {}", self.binary, args.join(" "))
            .trim_end()
            .to_string();
        debug!("running {command_line}");

        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(if merge_stderr {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .output()
            .map_err(|e| AdapterError::Spawn {
                command: command_line.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(AdapterError::ExitStatus {
                command: command_line,
                code: output.status.code(),
            }
            .into());
        }

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        if merge_stderr {
            text.push_str(&String::from_utf8_lossy(&output.stderr));
        }
        Ok(text)
    }
}

impl ToolAdapter for GpacBinary {
    fn version(&self) -> Result<Option<String>> {
        // Bare `gpac` prints its banner, version included, on stderr.
        let text = self.run(&[], true)?;
        Ok(scrape::version(&text))
    }

    fn filters(&self) -> Result<Vec<String>> {
        let text = self.run(&["-h", "filters"], false)?;
        Ok(scrape::filters(&text))
    }

    fn modules(&self) -> Result<Vec<String>> {
        let text = self.run(&["-h", "modules"], false)?;
        Ok(scrape::modules(&text))
    }

    fn filter_args(&self, filter: &str) -> Result<Vec<ArgumentSpec>> {
        let query = format!("{filter}.*");
        let text = self.run(&["-h", &query, "-logs=ncl"], false)?;
        Ok(scrape::filter_args(&text))
    }

    fn argument(&self, filter: &str, arg: &str) -> Result<ArgumentDetail> {
        let query = format!("{filter}.{arg}");
        let text = self.run(&["-h", &query], false)?;
        Ok(scrape::argument(&text, arg))
    }

    fn protocols(&self) -> Result<Vec<Protocol>> {
        let text = self.run(&["-ha", "protocols", "-logs=ncl"], false)?;
        Ok(scrape::protocols(&text))
    }

    fn props(&self) -> Result<Vec<String>> {
        let text = self.run(&["-h", "props"], false)?;
        Ok(scrape::props(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompleterError;

    #[test]
    fn test_missing_binary_is_hard_error() {
        let adapter = GpacBinary::new("/nonexistent/path/to/gpac-binary");
        let err = adapter.filters().unwrap_err();
        assert!(matches!(
            err,
            CompleterError::Adapter(AdapterError::Spawn { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_version_from_bare_invocation_banner() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("gpac");
        fs::write(
            &script,
            "#!/bin/sh\n[ \"$#\" -eq 0 ] || exit 2\necho 'GPAC version 2.4-DEV-rev1' >&2\n",
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let adapter = GpacBinary::new(script.to_str().unwrap());
        assert_eq!(adapter.version().unwrap().as_deref(), Some("2.4-DEV-rev1"));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_binary_is_hard_error() {
        let adapter = GpacBinary::new("false");
        let err = adapter.props().unwrap_err();
        assert!(matches!(
            err,
            CompleterError::Adapter(AdapterError::ExitStatus { code: Some(1), .. })
        ));
    }
}
