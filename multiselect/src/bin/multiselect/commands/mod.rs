pub mod options;
pub mod value;

use std::path::Path;

use anyhow::{Context, Result};
use multiselect::{OptionsPayload, RawOptions, format_options};
use serde_json::Value;

/// Read and parse a JSON document from disk
pub fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} as JSON", path.display()))
}

/// Load an options payload, formatting it first when the file holds a raw label mapping
pub fn load_options(path: &Path, raw: bool) -> Result<OptionsPayload> {
    let document = read_json(path)?;
    if raw {
        let mapping = RawOptions::from_json(document)
            .with_context(|| format!("Invalid label mapping in {}", path.display()))?;
        return Ok(format_options(&mapping));
    }
    OptionsPayload::from_json(document)
        .with_context(|| format!("Invalid options payload in {}", path.display()))
}
