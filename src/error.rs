use std::path::PathBuf;

use thiserror::Error;

/// Configuration defects, reported when an engine is built.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "unrecognized identifier scheme `{0}`; expected canon_smiles, kekule_smiles, structure_hash or inchi"
    )]
    UnknownScheme(String),
    #[error("failed to read config file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
}
