use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default cap on nested third-party (`}`) packets
pub const DEFAULT_MAX_THIRD_PARTY_DEPTH: usize = 8;

/// Decoder options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Accept destination callsigns that do not match the 6-character
    /// grammar. Servers relaying non-conformant traffic need this.
    #[serde(default)]
    pub disable_destination_callsign_validation: bool,
    /// How many levels of third-party wrapping are unwrapped before the
    /// packet is rejected
    #[serde(default = "default_max_third_party_depth")]
    pub max_third_party_depth: usize,
}

fn default_max_third_party_depth() -> usize {
    DEFAULT_MAX_THIRD_PARTY_DEPTH
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            disable_destination_callsign_validation: false,
            max_third_party_depth: DEFAULT_MAX_THIRD_PARTY_DEPTH,
        }
    }
}

impl ParseOptions {
    /// Load options from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let options: ParseOptions =
            toml::from_str(&contents).with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let options = ParseOptions::default();
        assert!(!options.disable_destination_callsign_validation);
        assert_eq!(options.max_third_party_depth, 8);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "disable_destination_callsign_validation = true").unwrap();

        let options = ParseOptions::load(file.path()).unwrap();
        assert!(options.disable_destination_callsign_validation);
        assert_eq!(options.max_third_party_depth, DEFAULT_MAX_THIRD_PARTY_DEPTH);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ParseOptions::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read"));
    }

    #[test]
    fn test_load_rejects_bad_types() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_third_party_depth = \"deep\"").unwrap();

        let err = ParseOptions::load(file.path()).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse"));
    }
}
