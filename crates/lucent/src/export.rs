//! Export of finished scenes.
//!
//! Rendering stops at an inert [`Scene`]; exporters turn one into an output
//! format for a drawing surface.
//!
//! # Available Backends
//!
//! - [`svg`]: SVG documents via [`svg::SvgBuilder`] and [`svg::Svg`]

pub mod svg;

use std::fmt;

use lucent_core::draw::Scene;

/// Abstraction for scene export backends.
pub trait Exporter {
    /// Converts `scene` into the backend's output format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the scene cannot be represented.
    fn export_scene(&self, scene: &Scene) -> Result<String, Error>;
}

/// Errors that can occur during scene export.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
