//! Line-retrieval boundary.
//!
//! The engine never performs I/O; whatever retrieves command output
//! (an SSH driver, a file, canned text) plugs in behind [`LineSource`].
//! [`FallbackSource`] implements the retry-free fallback policy: if the
//! primary source fails, substitute fixed sample text instead of
//! calling the engine with nothing.

use log::warn;

use crate::error::SourceError;

/// Supplier of raw command output for one device.
///
/// Implemented by upstream collaborators (SSH drivers and the like) and
/// by any `FnMut(&str) -> Result<String, SourceError>` closure, which
/// keeps tests and adapters one-liners.
pub trait LineSource {
    /// Retrieve the newline-delimited output of `command`.
    fn fetch(&mut self, command: &str) -> Result<String, SourceError>;
}

impl<F> LineSource for F
where
    F: FnMut(&str) -> Result<String, SourceError>,
{
    fn fetch(&mut self, command: &str) -> Result<String, SourceError> {
        self(command)
    }
}

/// A source that always returns the same canned output.
#[derive(Debug, Clone)]
pub struct StaticSource {
    output: String,
}

impl StaticSource {
    /// Create a source serving `output` for every command.
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
        }
    }
}

impl LineSource for StaticSource {
    fn fetch(&mut self, _command: &str) -> Result<String, SourceError> {
        Ok(self.output.clone())
    }
}

/// Wraps a primary source with fixed fallback text.
///
/// On primary failure the error is logged and the fallback text is
/// returned instead, so downstream parsing and validation still run.
#[derive(Debug)]
pub struct FallbackSource<P> {
    primary: P,
    fallback: String,
}

impl<P: LineSource> FallbackSource<P> {
    /// Wrap `primary`, substituting `fallback` when it fails.
    pub fn new(primary: P, fallback: impl Into<String>) -> Self {
        Self {
            primary,
            fallback: fallback.into(),
        }
    }
}

impl<P: LineSource> LineSource for FallbackSource<P> {
    fn fetch(&mut self, command: &str) -> Result<String, SourceError> {
        match self.primary.fetch(command) {
            Ok(output) => Ok(output),
            Err(err) => {
                warn!("primary source failed for '{command}', using fallback: {err}");
                Ok(self.fallback.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_source() {
        let mut source = StaticSource::new("line one\nline two\n");
        let output = source.fetch("show standby brief").unwrap();
        assert_eq!(output.lines().count(), 2);
    }

    #[test]
    fn test_closure_source() {
        let mut source = |command: &str| Ok::<_, SourceError>(format!("ran {command}"));
        assert_eq!(source.fetch("uname -a").unwrap(), "ran uname -a");
    }

    #[test]
    fn test_fallback_on_failure() {
        let failing = |_: &str| {
            Err::<String, _>(SourceError::Retrieval {
                message: "connection timed out".to_string(),
            })
        };
        let mut source = FallbackSource::new(failing, "sample output");
        assert_eq!(source.fetch("show version").unwrap(), "sample output");
    }

    #[test]
    fn test_fallback_passes_through_success() {
        let mut source = FallbackSource::new(StaticSource::new("live output"), "sample output");
        assert_eq!(source.fetch("show version").unwrap(), "live output");
    }
}
