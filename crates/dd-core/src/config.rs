//! Configuration types and parsing for deepdup.yml

use crate::catalog::ColumnRef;
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// Main project configuration from deepdup.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Catalog definition file, relative to the project directory
    #[serde(default = "default_catalog_path")]
    pub catalog: String,

    /// Output directory for generated procedures
    #[serde(default = "default_target_path")]
    pub target_path: String,

    /// Copy procedures to generate with `deepdup generate`
    #[serde(default)]
    pub procedures: Vec<ProcedureConfig>,
}

/// Customization of one generated copy procedure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcedureConfig {
    /// Root table of the copy
    pub root: String,

    /// Procedure name (defaults to `Copy<RootSingularName>`)
    #[serde(default)]
    pub name: Option<String>,

    /// Input parameter holding the root row's primary key (defaults to `id`)
    #[serde(default)]
    pub primary_key_parameter: Option<String>,

    /// Output parameter receiving the copied root row's primary key
    #[serde(default)]
    pub primary_key_output_parameter: Option<String>,

    /// Column value overrides: `Table.Column` -> parameter name
    #[serde(default)]
    pub overrides: BTreeMap<String, String>,
}

fn default_catalog_path() -> String {
    "catalog.yml".to_string()
}

fn default_target_path() -> String {
    "target".to_string()
}

impl ProcedureConfig {
    /// Parsed override keys, in key order.
    ///
    /// Keys are validated when the config is loaded, so unparseable keys
    /// never reach this point through [`Config::load`].
    pub fn override_refs(&self) -> Vec<(ColumnRef, String)> {
        self.overrides
            .iter()
            .filter_map(|(key, value)| ColumnRef::parse(key).map(|r| (r, value.clone())))
            .collect()
    }
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for deepdup.yml or deepdup.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("deepdup.yml");
        let yaml_path = dir.join("deepdup.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.name.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }

        let mut names = HashSet::new();
        for (index, procedure) in self.procedures.iter().enumerate() {
            if procedure.root.is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: format!("procedures[{index}]: root table cannot be empty"),
                });
            }
            if let Some(name) = &procedure.name {
                if !names.insert(name.as_str()) {
                    return Err(CoreError::ConfigInvalid {
                        message: format!("procedures[{index}]: duplicate procedure name '{name}'"),
                    });
                }
            }
            if let Some(key) = procedure
                .overrides
                .keys()
                .find(|key| ColumnRef::parse(key).is_none())
            {
                return Err(CoreError::ConfigInvalid {
                    message: format!(
                        "procedures[{index}]: override key '{key}' must be of the form Table.Column"
                    ),
                });
            }
        }

        Ok(())
    }

    /// Absolute path of the catalog file
    pub fn catalog_path_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.catalog)
    }

    /// Absolute path of the output directory
    pub fn target_path_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.target_path)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
