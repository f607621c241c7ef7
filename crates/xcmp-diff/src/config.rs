use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DiffError, DiffResult};

/// Options controlling how two documents are compared.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// When `true`, reordering children is reported as a difference.
    pub ordered_children: bool,
    /// When `true`, element namespace URIs must match.
    pub compare_namespaces: bool,
    /// Stop after this many differences; `0` means no limit.
    pub max_differences: usize,
}

impl CompareConfig {
    /// Strict comparison: child order and namespaces both matter.
    pub fn strict() -> Self {
        Self {
            ordered_children: true,
            compare_namespaces: true,
            ..Default::default()
        }
    }

    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> DiffResult<Self> {
        toml::from_str(text).map_err(|e| DiffError::InvalidConfig(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> DiffResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DiffError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = CompareConfig::from_toml_str("").unwrap();
        assert_eq!(config, CompareConfig::default());
    }

    #[test]
    fn partial_toml_overrides_given_keys() {
        let config = CompareConfig::from_toml_str("ordered_children = true\nmax_differences = 5").unwrap();
        assert!(config.ordered_children);
        assert!(!config.compare_namespaces);
        assert_eq!(config.max_differences, 5);
    }

    #[test]
    fn wrong_type_is_rejected() {
        let err = CompareConfig::from_toml_str("ordered_children = \"yes\"").unwrap_err();
        assert!(matches!(err, DiffError::InvalidConfig(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xcmp.toml");
        std::fs::write(&path, "compare_namespaces = true\n").unwrap();
        let config = CompareConfig::load(&path).unwrap();
        assert!(config.compare_namespaces);
    }

    #[test]
    fn load_missing_file_reports_path() {
        let err = CompareConfig::load("/nonexistent/xcmp.toml").unwrap_err();
        assert!(matches!(err, DiffError::ConfigIo { .. }));
        assert!(err.to_string().contains("/nonexistent/xcmp.toml"));
    }

    #[test]
    fn strict_enables_everything() {
        let config = CompareConfig::strict();
        assert!(config.ordered_children && config.compare_namespaces);
    }
}
