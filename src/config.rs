//! YAML configuration for the layoutprep pipeline.
//!
//! Everything the excluded collaborators need (annotation-service endpoint
//! and token, document-store coordinates) plus the stage configurations is
//! carried in one explicit config struct passed into the pipeline — no
//! ambient environment reads.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "pii project"
//!
//! service:
//!   endpoint: "https://labels.example.com"
//!   token: "abc123"
//!   project_id: "42"
//!
//! database:
//!   host: "localhost:27017"
//!   name: "mydbs"
//!   username: "reader"
//!   password: "secret"
//!
//! ocr:
//!   lang: "eng"
//!   oem: 3
//!   dpi: 600
//!
//! export:
//!   output_dir: "annotations"
//!   task_type: "LayoutLM V3"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use lpp_ocr::{OcrConfig, DEFAULT_TASK_TYPE};

/// Errors that can occur when loading the pipeline configuration.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level configuration for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutPrepConfig {
    /// Configuration format version.
    pub version: String,

    /// Optional configuration name/description.
    #[serde(default)]
    pub name: Option<String>,

    /// Annotation-service coordinates.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Document-store coordinates.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// OCR boundary configuration.
    #[serde(default)]
    pub ocr: OcrConfig,

    /// Output/export configuration.
    #[serde(default)]
    pub export: ExportConfig,
}

impl LayoutPrepConfig {
    /// Load a YAML configuration file from the given path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: LayoutPrepConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.service.validate()?;
        self.database.validate()?;

        if self.ocr.version == 0 {
            return Err(ConfigLoadError::Validation(
                "ocr.version must be >= 1".to_string(),
            ));
        }
        if self.ocr.oem > 3 {
            return Err(ConfigLoadError::Validation(
                "ocr.oem must be 0..=3".to_string(),
            ));
        }
        if self.ocr.dpi == 0 {
            return Err(ConfigLoadError::Validation(
                "ocr.dpi must be >= 1".to_string(),
            ));
        }

        self.export.validate()?;
        Ok(())
    }
}

impl Default for LayoutPrepConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            service: ServiceConfig::default(),
            database: DatabaseConfig::default(),
            ocr: OcrConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

/// Annotation-service coordinates: where tasks are imported to and exports
/// are fetched from. Left empty for offline (merge-only) runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub endpoint: String,
    pub token: String,
    pub project_id: String,
}

impl ServiceConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.endpoint.ends_with('/') {
            return Err(ConfigLoadError::Validation(
                "service.endpoint must not end with '/'".to_string(),
            ));
        }
        if !self.endpoint.is_empty() && self.project_id.is_empty() {
            return Err(ConfigLoadError::Validation(
                "service.project_id is required when service.endpoint is set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Document-store coordinates. Credentials are explicit fields here, not
/// process environment reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub name: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl DatabaseConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.host.is_empty() {
            return Err(ConfigLoadError::Validation(
                "database.host must not be empty".to_string(),
            ));
        }
        if self.name.is_empty() {
            return Err(ConfigLoadError::Validation(
                "database.name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost:27017".to_string(),
            name: "mydbs".to_string(),
            username: None,
            password: None,
        }
    }
}

/// Where label files land and how imported tasks are tagged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub task_type: String,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigLoadError::Validation(
                "export.output_dir must not be empty".to_string(),
            ));
        }
        if self.task_type.is_empty() {
            return Err(ConfigLoadError::Validation(
                "export.task_type must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("annotations"),
            task_type: DEFAULT_TASK_TYPE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_yaml() {
        let yaml = r#"
version: "1.0"
name: "pii project"
service:
  endpoint: "https://labels.example.com"
  token: "abc123"
  project_id: "42"
database:
  host: "mongo:27017"
  name: "documents"
"#;

        let config = LayoutPrepConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.name, Some("pii project".to_string()));
        assert_eq!(config.service.project_id, "42");
        assert_eq!(config.database.host, "mongo:27017");
        assert_eq!(config.ocr.lang, "eng");
        assert_eq!(config.export.output_dir, PathBuf::from("annotations"));
    }

    #[test]
    fn test_load_from_file() {
        let yaml = r#"
version: "1.0"
export:
  output_dir: "out"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        let config = LayoutPrepConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.export.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_default_config() {
        let config = LayoutPrepConfig::default();
        assert_eq!(config.version, "1.0");
        assert!(config.name.is_none());
        assert_eq!(config.database.host, "localhost:27017");
        assert_eq!(config.export.task_type, DEFAULT_TASK_TYPE);
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let result = LayoutPrepConfig::from_yaml("version: \"2.0\"\n");
        assert!(matches!(
            result,
            Err(ConfigLoadError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_trailing_slash_endpoint_rejected() {
        let yaml = r#"
version: "1.0"
service:
  endpoint: "https://labels.example.com/"
  project_id: "42"
"#;
        let result = LayoutPrepConfig::from_yaml(yaml);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("must not end with '/'"));
    }

    #[test]
    fn test_endpoint_without_project_rejected() {
        let yaml = r#"
version: "1.0"
service:
  endpoint: "https://labels.example.com"
"#;
        let result = LayoutPrepConfig::from_yaml(yaml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("project_id"));
    }

    #[test]
    fn test_ocr_validation() {
        let yaml = r#"
version: "1.0"
ocr:
  dpi: 0
"#;
        let result = LayoutPrepConfig::from_yaml(yaml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("dpi"));
    }
}
