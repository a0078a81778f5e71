//! Reading, checking and printing `.rulediff.yaml`.

use super::model::{Config, DEFAULT_CONFIG_FILE};
use crate::discovery::{PathFilter, PatternList};
use crate::error::{DiscoveryError, Result};
use std::path::Path;

impl Config {
    /// Read and validate the config at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            DiscoveryError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load the config for a repository.
    ///
    /// An explicit path must exist. Without one, `.rulediff.yaml` in
    /// `repo_root` is used when present, defaults otherwise.
    pub fn discover<P: AsRef<Path>>(explicit: Option<&Path>, repo_root: P) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let default_path = repo_root.as_ref().join(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            tracing::debug!(path = %default_path.display(), "loading config file");
            Self::load(default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate YAML text. Blank input yields the defaults, and
    /// keys this version does not know are ignored.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml)
                .map_err(|e| DiscoveryError::Config(format!("failed to parse config YAML: {}", e)))?
        };

        config.validate()?;
        Ok(config)
    }

    /// YAML form, as printed by `rulediff config`.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            DiscoveryError::Config(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Reject values discovery cannot run with:
    /// - `base_branch` must be non-empty
    /// - `max_commits` must be positive
    /// - every `include`, `exclude` and `relaxed` pattern must compile
    pub fn validate(&self) -> Result<()> {
        if self.base_branch.trim().is_empty() {
            return Err(DiscoveryError::Config(
                "config validation failed: base_branch must not be empty".to_string(),
            ));
        }

        if self.max_commits == 0 {
            return Err(DiscoveryError::Config(
                "config validation failed: max_commits must be greater than 0".to_string(),
            ));
        }

        self.path_filter()?;
        self.relaxed_patterns()?;

        Ok(())
    }

    /// Compile `include` and `exclude` into a path filter.
    pub fn path_filter(&self) -> Result<PathFilter> {
        PathFilter::new(&self.include, &self.exclude)
    }

    /// Compile the `relaxed` patterns.
    pub fn relaxed_patterns(&self) -> Result<PatternList> {
        PatternList::compile(&self.relaxed, "relaxed")
    }
}
