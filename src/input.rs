//! Evolution-document loading. Every deserialization error carries the JSON
//! path to the offending node, so a bad operation tag or REPLACE target
//! points at the exact group that used it.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::descriptor::Operation;
use crate::error::DdlError;

pub fn evolution_from_str(source: &str) -> Result<Vec<Operation>, DdlError> {
    let de = &mut serde_json::Deserializer::from_str(source);
    serde_path_to_error::deserialize(de).map_err(input_error)
}

pub fn evolution_from_slice(bytes: &[u8]) -> Result<Vec<Operation>, DdlError> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(de).map_err(input_error)
}

pub fn evolution_from_value(value: Value) -> Result<Vec<Operation>, DdlError> {
    serde_path_to_error::deserialize(value).map_err(input_error)
}

/// Load one document from disk, optionally selecting the operation list by
/// JSON Pointer (for documents that embed it under a wrapper node).
pub fn evolution_from_path(file: &Path, pointer: Option<&str>) -> Result<Vec<Operation>, DdlError> {
    let source = fs::read_to_string(file).map_err(|source| DdlError::Io {
        path: file.to_path_buf(),
        source,
    })?;
    match pointer {
        None => evolution_from_str(&source),
        Some(pointer) => {
            let document: Value =
                serde_json::from_str(&source).map_err(|source| DdlError::Input {
                    path: ".".to_string(),
                    source,
                })?;
            let node = document
                .pointer(pointer)
                .cloned()
                .ok_or_else(|| DdlError::PointerNotFound {
                    pointer: pointer.to_string(),
                })?;
            evolution_from_value(node)
        }
    }
}

fn input_error(err: serde_path_to_error::Error<serde_json::Error>) -> DdlError {
    DdlError::Input {
        path: err.path().to_string(),
        source: err.into_inner(),
    }
}
