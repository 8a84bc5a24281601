//! Loads the peer template file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use serde_json::Value;
use thiserror::Error;

use crate::types::Template;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template file {0} not found")]
    NotFound(PathBuf),
    #[error("failed to read template file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0} has no non-empty `peers` array")]
    MissingPeers(PathBuf),
    #[error("first entry of `peers` in {0} is not an object")]
    PeerNotObject(PathBuf),
}

/// Reads `path` and keeps the first entry of its `peers` array.
pub fn load_template(path: &Path) -> Result<Template, TemplateError> {
    let raw = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => TemplateError::NotFound(path.to_path_buf()),
        _ => TemplateError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let doc: Value = serde_json::from_str(&raw).map_err(|e| TemplateError::InvalidJson {
        path: path.to_path_buf(),
        source: e,
    })?;

    let first = doc
        .get("peers")
        .and_then(Value::as_array)
        .and_then(|peers| peers.first())
        .ok_or_else(|| TemplateError::MissingPeers(path.to_path_buf()))?;

    let peer = first
        .as_object()
        .cloned()
        .ok_or_else(|| TemplateError::PeerNotObject(path.to_path_buf()))?;

    debug!("Loaded template from {} with {} fields", path.display(), peer.len());
    Ok(Template::new(peer))
}
