//! Error types for Lucent rendering.
//!
//! Every failure is local to one descriptor: [`RenderFailure`] is returned by
//! value and never aborts sibling renders.

use std::fmt;

use thiserror::Error;

/// The discriminant of a [`RenderFailure`], for callers that branch on the
/// kind without caring about the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    MalformedDescriptor,
    UnsupportedDiagramKind,
    LayoutDidNotConverge,
    Cancelled,
    Internal,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MalformedDescriptor => "malformed descriptor",
            Self::UnsupportedDiagramKind => "unsupported diagram kind",
            Self::LayoutDidNotConverge => "layout did not converge",
            Self::Cancelled => "cancelled",
            Self::Internal => "internal error",
        };
        f.write_str(name)
    }
}

/// Why a single diagram could not be rendered.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderFailure {
    /// Structurally invalid input: missing payload, cyclic tree, dangling
    /// edge, negative weight, unparseable style value.
    #[error("Malformed descriptor: {0}")]
    MalformedDescriptor(String),

    /// The descriptor's `kind` is not one this renderer understands.
    #[error("Unsupported diagram kind: `{0}`")]
    UnsupportedDiagramKind(String),

    /// The force simulation hit its tick cap and strict convergence is on.
    #[error("Layout did not converge within {ticks} ticks")]
    LayoutDidNotConverge { ticks: usize },

    /// The caller abandoned the simulation.
    #[error("Layout cancelled after {ticks} ticks")]
    Cancelled { ticks: usize },

    /// A layout panicked; only produced by batch rendering.
    #[error("Internal layout error: {0}")]
    Internal(String),
}

impl RenderFailure {
    /// Shorthand for a [`RenderFailure::MalformedDescriptor`].
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDescriptor(message.into())
    }

    /// Returns the kind of this failure.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::MalformedDescriptor(_) => FailureKind::MalformedDescriptor,
            Self::UnsupportedDiagramKind(_) => FailureKind::UnsupportedDiagramKind,
            Self::LayoutDidNotConverge { .. } => FailureKind::LayoutDidNotConverge,
            Self::Cancelled { .. } => FailureKind::Cancelled,
            Self::Internal(_) => FailureKind::Internal,
        }
    }

    /// Returns the human-readable message shown in error placeholders.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<serde_json::Error> for RenderFailure {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedDescriptor(err.to_string())
    }
}
