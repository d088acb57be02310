//! Ecomap build configuration, loaded from TOML.
//!
//! ```toml
//! validation = "advisory"
//!
//! [output]
//! created_by = "ecomap-creator"
//! source = "case_0421.xlsx"
//!
//! [relations]
//! color = "#999"
//! line_width = 2
//! ```
//!
//! Every key is optional.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcomapConfig {
    /// Metadata written into the graph output.
    pub output: OutputConfig,

    /// Drawing defaults for relations.
    pub relations: RelationStyle,

    /// Whether validation errors abort the build.
    pub validation: ValidationMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub created_by: String,
    pub version: String,
    pub schema_version: String,
    /// Names the input: a file name, or `interactive_mode`.
    pub source: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            created_by: "ecomap-creator".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            schema_version: "1.0.0".to_string(),
            source: "record_set".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationStyle {
    pub color: String,
    pub line_width: u32,
}

impl Default for RelationStyle {
    fn default() -> Self {
        Self {
            color: "#999".to_string(),
            line_width: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Abort with the full error list.
    #[default]
    Strict,
    /// Log each error and build anyway.
    Advisory,
}

impl EcomapConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a TOML file. Unlike a missing key, a missing file is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Set the `source` written into graph metadata.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.output.source = source.into();
        self
    }

    /// Set the validation mode.
    pub fn with_validation(mut self, mode: ValidationMode) -> Self {
        self.validation = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EcomapConfig::default();
        assert_eq!(config.output.created_by, "ecomap-creator");
        assert_eq!(config.output.schema_version, "1.0.0");
        assert_eq!(config.relations.color, "#999");
        assert_eq!(config.relations.line_width, 2);
        assert_eq!(config.validation, ValidationMode::Strict);
    }

    #[test]
    fn test_partial_toml() {
        let config = EcomapConfig::from_toml_str(
            r#"
validation = "advisory"

[relations]
line_width = 3
"#,
        )
        .unwrap();

        assert_eq!(config.validation, ValidationMode::Advisory);
        assert_eq!(config.relations.line_width, 3);
        assert_eq!(config.relations.color, "#999");
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(EcomapConfig::from_toml_str("").unwrap(), EcomapConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        let err = EcomapConfig::from_toml_str("validation = \"sometimes\"").unwrap_err();
        assert!(matches!(err, crate::EcomapError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output]\nsource = \"case_0421.xlsx\"").unwrap();

        let config = EcomapConfig::load(file.path()).unwrap();
        assert_eq!(config.output.source, "case_0421.xlsx");
        assert_eq!(config.output.created_by, "ecomap-creator");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = EcomapConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, crate::EcomapError::Io(_)));
    }

    #[test]
    fn test_builders() {
        let config = EcomapConfig::default()
            .with_source("interactive_mode")
            .with_validation(ValidationMode::Advisory);
        assert_eq!(config.output.source, "interactive_mode");
        assert_eq!(config.validation, ValidationMode::Advisory);
    }
}
