//! Template configuration loading.
//!
//! A template may carry a `.gpc.yml` (or `.gpc.yaml`) file at its root
//! listing which files are templates and which variables they expect:
//!
//! ```yaml
//! templates:
//!   - "*.txt"
//!   - "Cargo.toml"
//! variables:
//!   - name: Name
//!     description: Project name
//!     default: World
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{GpcError, GpcResult};

/// Recognized configuration filenames, in lookup order.
pub const CONFIG_FILE_NAMES: [&str; 2] = [".gpc.yml", ".gpc.yaml"];

/// A variable declared by a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub default: Value,
}

impl VariableDeclaration {
    pub fn new(name: impl Into<String>, description: impl Into<String>, default: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            default,
        }
    }
}

/// Per-template configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Glob patterns matched against file base names.
    #[serde(default)]
    pub templates: Vec<String>,
    /// Declared variables.
    #[serde(default)]
    pub variables: Vec<VariableDeclaration>,
}

impl TemplateConfig {
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty() && self.variables.is_empty()
    }

    /// Check that every variable has a non-empty, unique name.
    fn validate(&self, path: &Path) -> GpcResult<()> {
        let mut seen = HashSet::new();
        for var in &self.variables {
            if var.name.trim().is_empty() {
                return Err(GpcError::InvalidConfig {
                    path: path.to_path_buf(),
                    message: "variable with empty name".to_string(),
                });
            }
            if !seen.insert(var.name.as_str()) {
                return Err(GpcError::InvalidConfig {
                    path: path.to_path_buf(),
                    message: format!("duplicate variable '{}'", var.name),
                });
            }
        }
        Ok(())
    }
}

/// Reads template configuration from a template root.
pub struct ConfigReader {
    root: PathBuf,
}

impl ConfigReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the first configuration file present, if any.
    pub fn locate(&self) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| self.root.join(name))
            .find(|path| path.is_file())
    }

    /// Load the configuration, or an empty one when the template has none.
    pub fn read(&self) -> GpcResult<TemplateConfig> {
        let Some(path) = self.locate() else {
            debug!("No template config in {:?}", self.root);
            return Ok(TemplateConfig::default());
        };

        let config = self.load(&path)?;
        info!(
            "Loaded template config {:?} ({} patterns, {} variables)",
            path,
            config.templates.len(),
            config.variables.len()
        );
        Ok(config)
    }

    fn load(&self, path: &Path) -> GpcResult<TemplateConfig> {
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(TemplateConfig::default());
        }

        let config: TemplateConfig =
            serde_yaml::from_str(&content).map_err(|e| GpcError::InvalidConfig {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        config.validate(path)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_missing_config_is_empty() {
        let temp = tempdir().unwrap();
        let config = ConfigReader::new(temp.path()).read().unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_yml_takes_precedence() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(".gpc.yml"), "templates: [\"*.yml\"]\n").unwrap();
        fs::write(temp.path().join(".gpc.yaml"), "templates: [\"*.yaml\"]\n").unwrap();

        let config = ConfigReader::new(temp.path()).read().unwrap();
        assert_eq!(config.templates, vec!["*.yml"]);
    }

    #[test]
    fn test_yaml_fallback() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join(".gpc.yaml"),
            concat!(
                "templates:\n  - \"*.md\"\n",
                "variables:\n  - name: Port\n    description: Port\n    default: 8080\n",
            ),
        )
        .unwrap();

        let config = ConfigReader::new(temp.path()).read().unwrap();
        assert_eq!(config.templates, vec!["*.md"]);
        assert_eq!(config.variables[0].default, json!(8080));
    }

    #[test]
    fn test_structured_default() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join(".gpc.yml"),
            "variables:\n  - name: Authors\n    default: [ada, grace]\n",
        )
        .unwrap();

        let config = ConfigReader::new(temp.path()).read().unwrap();
        assert_eq!(config.variables[0].default, json!(["ada", "grace"]));
        assert_eq!(config.variables[0].description, "");
    }

    #[test]
    fn test_malformed_config_fails() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(".gpc.yml"), "templates: [unclosed\n").unwrap();

        let err = ConfigReader::new(temp.path()).read().unwrap_err();
        assert!(matches!(err, GpcError::InvalidConfig { .. }));
    }

    #[test]
    fn test_duplicate_variable_rejected() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join(".gpc.yml"),
            "variables:\n  - name: A\n  - name: A\n",
        )
        .unwrap();

        let err = ConfigReader::new(temp.path()).read().unwrap_err();
        assert!(err.to_string().contains("duplicate variable 'A'"));
    }

    #[test]
    fn test_empty_variable_name_rejected() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(".gpc.yml"), "variables:\n  - name: \"\"\n").unwrap();

        assert!(ConfigReader::new(temp.path()).read().is_err());
    }
}
