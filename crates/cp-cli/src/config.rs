//! Option files in RON

use std::path::Path;

use cp_core::DecompositionOptions;

/// Errors reading an option file
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

/// Load options from a RON file; fields left out keep their defaults
pub fn load_options(path: impl AsRef<Path>) -> Result<DecompositionOptions, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
    parse_options(&content)
}

/// Parse options from RON text
pub fn parse_options(content: &str) -> Result<DecompositionOptions, ConfigError> {
    ron::from_str(content).map_err(|e| ConfigError::Deserialize(e.to_string()))
}
