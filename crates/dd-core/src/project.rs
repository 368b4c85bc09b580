//! Project discovery and loading

use crate::catalog::Catalog;
use crate::catalog_file::CatalogFile;
use crate::config::Config;
use crate::error::CoreResult;
use crate::graph::ForeignKeyGraph;
use std::path::{Path, PathBuf};

/// A deepdup project: configuration plus the catalog it points at
#[derive(Debug)]
pub struct Project {
    /// Project root directory
    pub root: PathBuf,

    /// Project configuration
    pub config: Config,

    /// Catalog loaded from `config.catalog`
    pub catalog: Catalog,
}

impl Project {
    /// Load a project from a directory containing deepdup.yml
    pub fn load(root: &Path) -> CoreResult<Self> {
        let config = Config::load_from_dir(root)?;
        Self::from_config(root, config)
    }

    /// Load a project using an explicit config file
    pub fn load_with_config(root: &Path, config_path: &Path) -> CoreResult<Self> {
        let config = Config::load(config_path)?;
        Self::from_config(root, config)
    }

    fn from_config(root: &Path, config: Config) -> CoreResult<Self> {
        let catalog_path = config.catalog_path_absolute(root);
        let catalog = CatalogFile::load(&catalog_path)?.into_catalog()?;

        let cycles = ForeignKeyGraph::build(&catalog).cycles();
        for cycle in &cycles {
            let names: Vec<&str> = cycle
                .iter()
                .map(|&id| catalog.table(id).name().as_str())
                .collect();
            log::warn!(
                "Foreign keys form a cycle between: {}. Cyclic references are remapped in deferred updates.",
                names.join(", ")
            );
        }

        Ok(Self {
            root: root.to_path_buf(),
            config,
            catalog,
        })
    }

    /// Directory generated procedures are written to
    pub fn target_dir(&self) -> PathBuf {
        self.config.target_path_absolute(&self.root)
    }
}
