use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::FilterError;
use crate::normalize::DedupMode;
use crate::resolve::{MAX_DECODE_DEPTH, ValueResolver};

/// Settings stored in `multiselect.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub normalize: NormalizeSettings,
    #[serde(default)]
    pub value: ValueSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizeSettings {
    #[serde(default)]
    pub dedup: DedupMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSettings {
    #[serde(default = "default_max_decode_depth")]
    pub max_decode_depth: usize,
}

impl Default for ValueSettings {
    fn default() -> Self {
        Self {
            max_decode_depth: default_max_decode_depth(),
        }
    }
}

fn default_max_decode_depth() -> usize {
    MAX_DECODE_DEPTH
}

impl Settings {
    pub fn from_toml_str(raw: &str) -> Result<Self, FilterError> {
        Ok(toml::from_str(raw)?)
    }

    /// Reads settings from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, FilterError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::from_toml_str(&raw),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(FilterError::Io {
                path: path.display().to_string(),
                source: err,
            }),
        }
    }

    pub fn resolver(&self) -> ValueResolver {
        ValueResolver::new(self.value.max_decode_depth)
    }
}
