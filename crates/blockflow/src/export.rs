//! Export of composed scenes.
//!
//! The [`Exporter`] trait is the last stage of the pipeline:
//!
//! ```text
//! SceneDefinition
//!     ↓ validate
//! Diagram
//!     ↓ project, route, animate
//! LayeredOutput (one frame, or a self-animating scene)
//!     ↓ export (this module)
//! Output document
//! ```
//!
//! # Available Backends
//!
//! - [`svg`]: SVG documents via [`svg::Svg`]
//!
//! # Error Handling
//!
//! Export operations return [`Error`], which converts into
//! [`BlockflowError::Export`] at the crate boundary.
//!
//! [`BlockflowError::Export`]: crate::BlockflowError::Export

pub mod svg;

use blockflow_core::draw::LayeredOutput;

/// Abstraction for scene export backends.
pub trait Exporter {
    /// Writes a composed scene in the backend's output format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the scene cannot be converted to the
    /// target format, or [`Error::Io`] if writing the output fails.
    fn export_scene(&mut self, layers: LayeredOutput) -> Result<(), Error>;
}

/// Errors that can occur during export.
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_error_display_and_source() {
        let render = Error::Render("bad gradient".to_string());
        assert_eq!(render.to_string(), "Render error: bad gradient");
        assert!(render.source().is_none());

        let io = Error::from(std::io::Error::other("disk full"));
        assert!(io.to_string().contains("disk full"));
        assert!(io.source().is_some());
    }
}
