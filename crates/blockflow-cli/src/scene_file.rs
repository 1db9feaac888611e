//! Scene file loading.

use std::{fs, path::Path};

use log::debug;

use blockflow::definition::SceneDefinition;

use crate::error::CliError;

/// Reads and deserializes a TOML scene file.
///
/// # Errors
///
/// Returns [`CliError::Io`] if the file cannot be read and
/// [`CliError::SceneFile`] if it is not a valid scene table. Node and edge
/// references are not checked here.
pub fn load_scene(path: impl AsRef<Path>) -> Result<SceneDefinition, CliError> {
    let path = path.as_ref();
    let src = fs::read_to_string(path)?;
    let definition = parse_scene(path, src)?;
    debug!(
        nodes = definition.nodes().len(),
        edges = definition.edges().len();
        "Scene file parsed"
    );
    Ok(definition)
}

fn parse_scene(path: &Path, src: String) -> Result<SceneDefinition, CliError> {
    toml::from_str(&src).map_err(|err: toml::de::Error| CliError::SceneFile {
        path: path.to_path_buf(),
        message: err.message().to_string(),
        span: err.span(),
        src,
    })
}
