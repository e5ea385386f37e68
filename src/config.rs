use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::identity::IdentifierScheme;
use crate::scaffold::PreprocessOptions;

pub const DEFAULT_RING_CUTOFF: usize = 10;

/// Engine settings. Every field has a default, so a config file only needs
/// to name what it changes.
///
/// ```
/// use hiers::{EngineConfig, IdentifierScheme};
///
/// let config = EngineConfig::from_json_str(r#"{"identifier_scheme": "inchi"}"#).unwrap();
/// assert_eq!(config.identifier_scheme, IdentifierScheme::StructureHash);
/// assert_eq!(config.ring_cutoff, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub identifier_scheme: IdentifierScheme,
    /// Molecules with more ring systems than this are not decomposed.
    pub ring_cutoff: usize,
    /// Count rings joined at a single spiro atom as one ring system.
    pub merge_spiro: bool,
    pub preprocess: PreprocessOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            identifier_scheme: IdentifierScheme::default(),
            ring_cutoff: DEFAULT_RING_CUTOFF,
            merge_spiro: true,
            preprocess: PreprocessOptions::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}
