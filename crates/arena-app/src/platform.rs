//! Directory resolution for config and log files.

use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur during platform operations.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// The OS did not provide a configuration directory.
    #[error("could not determine OS configuration directory")]
    NoConfigDir,
    /// An I/O error occurred (e.g., directory creation failed).
    #[error("platform I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Where the generator keeps its files.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformDirs {
    /// Holds `config.ron`.
    pub config_dir: PathBuf,
    /// Holds JSON logs of debug builds.
    pub log_dir: PathBuf,
}

impl PlatformDirs {
    /// Resolve directories, rooted at `override_dir` if given and at the OS
    /// config location otherwise. Nothing is created on disk.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::NoConfigDir`] if no override is given and the
    /// OS does not expose a configuration directory.
    pub fn resolve(override_dir: Option<&Path>) -> Result<Self, PlatformError> {
        let config_dir = match override_dir {
            Some(dir) => dir.to_path_buf(),
            None => arena_config::default_config_dir().ok_or(PlatformError::NoConfigDir)?,
        };
        Ok(Self::resolve_with_root(&config_dir))
    }

    /// Directories rooted under `root`.
    pub fn resolve_with_root(root: &Path) -> Self {
        Self {
            config_dir: root.to_path_buf(),
            log_dir: root.join("logs"),
        }
    }

    /// Create all directories on disk.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Io`] if any directory cannot be created.
    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}
