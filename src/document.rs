//! JSON documents read by the driver: desired configurations and saved
//! states.

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};
use serde_json::Value;
use thiserror::Error;

use crate::state::ResourceState;

/// Errors raised while loading a document.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum DocumentError {
    /// The file could not be read.
    #[error("failed to read {path}: {message}")]
    Read {
        /// Path as given.
        path: String,
        /// Error reported by the filesystem.
        message: String,
    },
    /// The file is not valid JSON of the expected shape.
    #[error("failed to parse {path}: {message}")]
    Parse {
        /// Path as given.
        path: String,
        /// Error reported by the parser.
        message: String,
    },
    /// A configuration document is not a JSON object.
    #[error("{path} must contain a JSON object of attributes")]
    NotAnObject {
        /// Path as given.
        path: String,
    },
}

/// Loads a desired configuration: a JSON object of attribute values.
///
/// # Errors
///
/// Returns [`DocumentError`] when the file cannot be read, is not JSON, or
/// does not hold an object.
pub fn load_config(path: &str) -> Result<ResourceState, DocumentError> {
    let value = parse::<Value>(path, &read(path)?)?;
    match value {
        Value::Object(attributes) => Ok(ResourceState::from_attributes(attributes)),
        _ => Err(DocumentError::NotAnObject {
            path: path.to_owned(),
        }),
    }
}

/// Loads a saved state as written by the driver: `{"id": .., "attributes": {..}}`.
///
/// # Errors
///
/// Returns [`DocumentError`] when the file cannot be read or parsed.
pub fn load_state(path: &str) -> Result<ResourceState, DocumentError> {
    parse(path, &read(path)?)
}

fn parse<T: serde::de::DeserializeOwned>(path: &str, content: &str) -> Result<T, DocumentError> {
    serde_json::from_str(content).map_err(|err| DocumentError::Parse {
        path: path.to_owned(),
        message: err.to_string(),
    })
}

fn read(path: &str) -> Result<String, DocumentError> {
    read_to_string_ambient(path).map_err(|message| DocumentError::Read {
        path: path.to_owned(),
        message,
    })
}

fn read_to_string_ambient(path: &str) -> Result<String, String> {
    let full = Utf8Path::new(path);
    let (dir_path, file_path) = match (full.parent(), full.file_name()) {
        (Some(parent), Some(name)) if !parent.as_str().is_empty() => {
            (parent, Utf8Path::new(name))
        }
        (_, Some(_)) => (Utf8Path::new("."), full),
        (_, None) => return Err(format!("path has no file name: {full}")),
    };
    let dir =
        Dir::open_ambient_dir(dir_path, ambient_authority()).map_err(|err| err.to_string())?;
    dir.read_to_string(file_path).map_err(|err| err.to_string())
}
