use crate::{Error, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

/// Application directories following the platform conventions
#[derive(Debug, Clone)]
pub struct Directories {
    /// Config directory (~/.config/leetsearch)
    pub config: PathBuf,

    /// Cache directory (~/.cache/leetsearch), log files live here
    pub cache: PathBuf,

    /// Key-value preference file
    pub storage_file: PathBuf,
}

impl Directories {
    /// Resolve the standard per-user paths.
    ///
    /// # Errors
    ///
    /// Returns an error if the system's project directories cannot be determined
    /// (no home directory).
    pub fn new() -> Result<Self> {
        let project = ProjectDirs::from("", "", "leetsearch")
            .ok_or_else(|| Error::Config("could not determine home directory".to_string()))?;

        let config = project.config_dir().to_path_buf();
        let cache = project.cache_dir().to_path_buf();

        Ok(Self {
            storage_file: config.join("storage.json"),
            config,
            cache,
        })
    }

    #[must_use]
    pub fn with_base(base: PathBuf) -> Self {
        Self {
            storage_file: base.join("storage.json"),
            config: base.clone(),
            cache: base,
        }
    }

    /// Ensure all directories exist.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be created.
    pub fn ensure_exists(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config)?;
        std::fs::create_dir_all(&self.cache)?;
        Ok(())
    }
}
