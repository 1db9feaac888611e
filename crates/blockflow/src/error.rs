//! Error types for Blockflow operations.
//!
//! [`BlockflowError`] is the error returned at the library boundary. Scene
//! construction errors are fatal: no scene is built. Rendering a constructed
//! scene never fails for geometric reasons.

use std::io;

use thiserror::Error;

use blockflow_core::color::ColorError;

use crate::animation::AnimationError;

/// Which end of an edge a reference belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEndpoint {
    Source,
    Target,
}

impl std::fmt::Display for EdgeEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// The main error type for Blockflow operations.
#[derive(Debug, Error)]
pub enum BlockflowError {
    #[error("edge #{edge_index} {endpoint} references unknown node `{id}`")]
    UnknownNodeReference {
        edge_index: usize,
        endpoint: EdgeEndpoint,
        id: String,
    },

    #[error("node `{id}` has degenerate geometry: width {width}, height {height}")]
    DegenerateGeometry { id: String, width: f32, height: f32 },

    #[error("node `{id}` has invalid depth {depth}; depth must be finite and non-negative")]
    NegativeDepth { id: String, depth: f32 },

    #[error("duplicate node id `{id}`")]
    DuplicateNode { id: String },

    #[error("invalid {field} for {owner}: {source}")]
    InvalidColor {
        owner: String,
        field: &'static str,
        #[source]
        source: ColorError,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Animation error: {0}")]
    Animation(#[from] AnimationError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::export::Error> for BlockflowError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_node_message() {
        let err = BlockflowError::UnknownNodeReference {
            edge_index: 3,
            endpoint: EdgeEndpoint::Target,
            id: "lm-head".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "edge #3 target references unknown node `lm-head`"
        );
    }

    #[test]
    fn test_invalid_color_keeps_source() {
        use std::error::Error as _;

        let source = blockflow_core::color::Color::new("nope").unwrap_err();
        let err = BlockflowError::InvalidColor {
            owner: "node `a`".to_string(),
            field: "color",
            source,
        };
        assert!(err.to_string().starts_with("invalid color for node `a`"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_from_export_error() {
        let err: BlockflowError = crate::export::Error::Render("bad".to_string()).into();
        assert!(matches!(err, BlockflowError::Export(_)));
        assert!(err.to_string().contains("bad"));
    }
}
