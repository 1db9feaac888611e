//! Error adapter for converting CLI errors to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! Scene file errors carry the TOML source and the offending span, so they
//! render with a snippet. Everything else renders as a coded message with
//! help text.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use blockflow::BlockflowError;

use crate::{config::ConfigError, error::CliError};

/// Adapter for any [`CliError`].
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
        Some(Box::new(error_code(self.0)))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        error_help(self.0).map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self.0 {
            CliError::SceneFile { src, .. } => Some(src as &dyn miette::SourceCode),
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self.0 {
            CliError::SceneFile {
                span: Some(span),
                message,
                ..
            } => {
                let span = SourceSpan::new(span.start.into(), span.len());
                Some(Box::new(std::iter::once(
                    LabeledSpan::new_primary_with_span(Some(message.clone()), span),
                )))
            }
            _ => None,
        }
    }
}

/// Stable diagnostic code of an error.
pub fn error_code(err: &CliError) -> &'static str {
    match err {
        CliError::Blockflow(err) => match err {
            BlockflowError::UnknownNodeReference { .. } => "blockflow::unknown_node",
            BlockflowError::DegenerateGeometry { .. } => "blockflow::degenerate_geometry",
            BlockflowError::NegativeDepth { .. } => "blockflow::negative_depth",
            BlockflowError::DuplicateNode { .. } => "blockflow::duplicate_node",
            BlockflowError::InvalidColor { .. } => "blockflow::invalid_color",
            BlockflowError::Config(_) => "blockflow::config",
            BlockflowError::Animation(_) => "blockflow::animation",
            BlockflowError::Io(_) => "blockflow::io",
            BlockflowError::Export(_) => "blockflow::export",
        },
        CliError::Config(_) => "blockflow::config",
        CliError::SceneFile { .. } => "blockflow::scene_file",
        CliError::Io(_) => "blockflow::io",
    }
}

fn error_help(err: &CliError) -> Option<&'static str> {
    let help = match err {
        CliError::Blockflow(err) => match err {
            BlockflowError::UnknownNodeReference { .. } => {
                "every edge `from` and `to` must name the `id` of a `[[node]]` table"
            }
            BlockflowError::DegenerateGeometry { .. } => {
                "node width and height must be positive numbers"
            }
            BlockflowError::NegativeDepth { .. } => "use `depth = 0` for a flat block",
            BlockflowError::DuplicateNode { .. } => "node ids must be unique within a scene",
            BlockflowError::InvalidColor { .. } => {
                "use a CSS color such as `#3B82F6`, `rgb(59, 130, 246)` or `steelblue`"
            }
            BlockflowError::Config(_) => "check the values in your configuration file",
            BlockflowError::Animation(_) | BlockflowError::Io(_) | BlockflowError::Export(_) => {
                return None;
            }
        },
        CliError::Config(ConfigError::MissingFile(_)) => {
            "omit `--config` to search the default locations"
        }
        CliError::Config(_) => return None,
        CliError::SceneFile { .. } => {
            "scene files contain `[[node]]` tables (id, role, label, x, y, width, height) and `[[edge]]` tables (from, to)"
        }
        CliError::Io(_) => return None,
    };
    Some(help)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use blockflow::EdgeEndpoint;

    use super::*;

    #[test]
    fn test_unknown_node_code_and_help() {
        let err = CliError::from(BlockflowError::UnknownNodeReference {
            edge_index: 0,
            endpoint: EdgeEndpoint::Target,
            id: "decoder".to_string(),
        });
        let adapter = ErrorAdapter(&err);

        assert_eq!(adapter.code().unwrap().to_string(), "blockflow::unknown_node");
        assert!(adapter.help().unwrap().to_string().contains("[[node]]"));
        assert!(adapter.labels().is_none());
        assert_eq!(
            adapter.to_string(),
            "edge #0 target references unknown node `decoder`"
        );
    }

    #[test]
    fn test_degenerate_geometry_code() {
        let err = CliError::from(BlockflowError::DegenerateGeometry {
            id: "flat".to_string(),
            width: 0.0,
            height: 40.0,
        });
        assert_eq!(error_code(&err), "blockflow::degenerate_geometry");
    }

    #[test]
    fn test_scene_file_label() {
        let err = CliError::SceneFile {
            path: PathBuf::from("scene.toml"),
            message: "unknown field `shape`".to_string(),
            span: Some(9..14),
            src: "[[node]]\nshape = 1\n".to_string(),
        };
        let adapter = ErrorAdapter(&err);

        assert!(adapter.source_code().is_some());
        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert!(labels[0].primary());
        assert_eq!(labels[0].label(), Some("unknown field `shape`"));
        assert_eq!(labels[0].offset(), 9);
        assert_eq!(labels[0].len(), 5);
    }

    #[test]
    fn test_io_error_has_no_help() {
        let err = CliError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let adapter = ErrorAdapter(&err);
        assert_eq!(adapter.code().unwrap().to_string(), "blockflow::io");
        assert!(adapter.help().is_none());
        assert!(adapter.source_code().is_none());
    }
}
