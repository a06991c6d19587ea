//! Error type for the CLI.

use std::{io, path::PathBuf};

use thiserror::Error;

use lucent::{RenderFailure, config::ConfigError};

/// Everything that can stop or fail a CLI run.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Missing configuration file: {}", .0.display())]
    MissingConfig(PathBuf),

    #[error("Failed to parse TOML configuration: {0}")]
    ConfigParse(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The input is not valid JSON; `offset` is the byte position of the
    /// error within `src`.
    #[error("Invalid JSON in descriptor file: {message}")]
    Syntax {
        message: String,
        src: String,
        offset: usize,
    },

    #[error("Invalid descriptor file: {0}")]
    Descriptor(RenderFailure),

    #[error("{failed} of {total} diagrams failed to render")]
    Render { failed: usize, total: usize },
}

impl CliError {
    /// Wraps a JSON syntax error, converting its line and column into a
    /// byte offset into `src`.
    pub fn new_syntax_error(err: &serde_json::Error, src: &str) -> Self {
        let line_start: usize = src
            .split_inclusive('\n')
            .take(err.line().saturating_sub(1))
            .map(str::len)
            .sum();
        let offset = (line_start + err.column().saturating_sub(1)).min(src.len());
        Self::Syntax {
            message: err.to_string(),
            src: src.to_string(),
            offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_offset_points_at_error() {
        let src = "[\n  {\"kind\": \"tree\",, }\n]";
        let err = serde_json::from_str::<serde_json::Value>(src).unwrap_err();
        match CliError::new_syntax_error(&err, src) {
            CliError::Syntax { offset, .. } => assert_eq!(&src[offset..offset + 1], ","),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_syntax_offset_clamped_at_end() {
        let src = "{";
        let err = serde_json::from_str::<serde_json::Value>(src).unwrap_err();
        match CliError::new_syntax_error(&err, src) {
            CliError::Syntax { offset, .. } => assert!(offset <= src.len()),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }
}
