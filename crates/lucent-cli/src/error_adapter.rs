//! Error adapter for converting CliError to miette diagnostics.
//!
//! This module provides the bridge between the CLI's error type and miette's
//! rich diagnostic formatting. JSON syntax errors carry their source so the
//! offending position is labelled in the report.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use crate::error::CliError;

/// Adapter exposing a [`CliError`] as a miette diagnostic.
pub struct ErrorAdapter<'a>(pub &'a CliError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            CliError::Io(_) => "lucent::io",
            CliError::MissingConfig(_) | CliError::ConfigParse(_) | CliError::Config(_) => {
                "lucent::config"
            }
            CliError::Syntax { .. } | CliError::Descriptor(_) => "lucent::descriptor",
            CliError::Render { .. } => "lucent::render",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0 {
            CliError::MissingConfig(_) => "pass an existing file to --config or omit the flag",
            CliError::ConfigParse(_) | CliError::Config(_) => {
                "check the [layout] and [style] sections of the configuration file"
            }
            CliError::Descriptor(_) => {
                "the file must hold one descriptor object or an array of them"
            }
            CliError::Render { .. } => {
                "failed diagrams were written as error placeholders; rerun with --log-level warn for details"
            }
            CliError::Io(_) | CliError::Syntax { .. } => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self.0 {
            CliError::Syntax { src, .. } => Some(src as &dyn miette::SourceCode),
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self.0 {
            CliError::Syntax { src, offset, .. } => {
                let length = usize::from(*offset < src.len());
                let span = SourceSpan::new((*offset).into(), length);
                Some(Box::new(std::iter::once(LabeledSpan::new_primary_with_span(
                    Some("here".to_string()),
                    span,
                ))))
            }
            _ => None,
        }
    }
}

/// Wrap a [`CliError`] for rendering by a miette report handler.
pub fn to_reportable(err: &CliError) -> ErrorAdapter<'_> {
    ErrorAdapter(err)
}
