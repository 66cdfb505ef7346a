// Library-wide error taxonomy. Structural input problems fail before any
// statement text is produced.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DdlError {
    /// The evolution document did not deserialize; `path` is the JSON path
    /// to the offending node.
    #[error("invalid evolution document at JSON path {path}")]
    Input {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON pointer {pointer:?} selects nothing in the document")]
    PointerNotFound { pointer: String },

    /// A descriptor violating the structural contract: blank path, blank
    /// value kind, or a path with empty segments.
    #[error("malformed descriptor {path:?}: {reason}")]
    MalformedDescriptor { path: String, reason: String },

    #[error("reorder column {path:?} carries neither a value nor a moveafter target")]
    MissingReorderTarget { path: String },
}
