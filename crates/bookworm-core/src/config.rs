//! Layered YAML configuration.
//!
//! The system file is read first, then `~/.bookworm.yml`; any field present
//! in a later file replaces the earlier value. Missing files are skipped,
//! except for a file named explicitly with [`Configuration::from_file`].

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{BookwormError, Result};
use crate::keys::SourceDirKind;

pub const SYSTEM_CONFIGURATION_FILE: &str = "/usr/local/etc/bookworm/configuration.yml";
pub const USER_CONFIGURATION_FILE: &str = ".bookworm.yml";

/// Ordered search roots, split by what is found beneath them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SourceDirs {
    #[serde(default)]
    pub cookbook_dirs: Vec<PathBuf>,
    #[serde(default)]
    pub role_dirs: Vec<PathBuf>,
}

impl SourceDirs {
    pub fn for_kind(&self, kind: SourceDirKind) -> &[PathBuf] {
        match kind {
            SourceDirKind::CookbookDirs => &self.cookbook_dirs,
            SourceDirKind::RoleDirs => &self.role_dirs,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cookbook_dirs.is_empty() && self.role_dirs.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    pub source_dirs: SourceDirs,
    pub debug: bool,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    source_dirs: Option<SourceDirs>,
    debug: Option<bool>,
}

impl Configuration {
    /// Load the system file and the per-user override.
    pub fn load() -> Result<Self> {
        let mut files = vec![PathBuf::from(SYSTEM_CONFIGURATION_FILE)];
        if let Some(home) = dirs::home_dir() {
            files.push(home.join(USER_CONFIGURATION_FILE));
        }
        Self::from_files(&files)
    }

    /// Layer the given YAML files in order. Files that do not exist are skipped.
    pub fn from_files<P: AsRef<Path>>(files: &[P]) -> Result<Self> {
        let mut config = Configuration::default();

        for path in files {
            let path = path.as_ref();
            let text = match fs::read_to_string(path) {
                Ok(text) => text,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!(path = %path.display(), "no configuration file");
                    continue;
                }
                Err(source) => {
                    return Err(BookwormError::Read {
                        path: path.to_path_buf(),
                        source,
                    });
                }
            };
            debug!(path = %path.display(), "loading configuration");
            config.merge_yaml(path, &text)?;
        }

        Ok(config)
    }

    /// Read one configuration file that must exist.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| BookwormError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loading configuration");
        let mut config = Configuration::default();
        config.merge_yaml(path, &text)?;
        Ok(config)
    }

    /// Parse a single YAML document on top of defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let mut config = Configuration::default();
        config.merge_yaml(Path::new("<inline>"), text)?;
        Ok(config)
    }

    fn merge_yaml(&mut self, path: &Path, text: &str) -> Result<()> {
        let blank = text
            .lines()
            .map(str::trim)
            .all(|line| line.is_empty() || line.starts_with('#'));
        if blank {
            return Ok(());
        }

        // `~` and `null` documents deserialize as None.
        let file: Option<ConfigFile> =
            serde_yaml::from_str(text).map_err(|source| BookwormError::Config {
                path: path.to_path_buf(),
                source,
            })?;
        let Some(file) = file else {
            return Ok(());
        };

        if let Some(source_dirs) = file.source_dirs {
            self.source_dirs = source_dirs;
        }
        if let Some(debug) = file.debug {
            self.debug = debug;
        }
        Ok(())
    }

    /// A crawl needs somewhere to look.
    pub fn validate(&self) -> Result<()> {
        if self.source_dirs.is_empty() {
            return Err(BookwormError::EmptySourceDirs);
        }
        Ok(())
    }
}
