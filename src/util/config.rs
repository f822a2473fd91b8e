//! Configuration file support for targetgraph.
//!
//! targetgraph supports two configuration file locations:
//! - Global: `~/.targetgraph/config.toml` - User-wide defaults
//! - Project: `.targetgraph/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::{Language, LanguageFilter};
use crate::resolver::{DuplicatePolicy, ResolveOptions};

/// targetgraph configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Resolve settings
    pub resolve: ResolveConfig,

    /// Language settings
    pub languages: LanguagesConfig,
}

/// Resolve-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Identity collision policy (error, first-wins)
    pub on_duplicate: Option<String>,

    /// Parallel jobs for the fetch batch (None = auto-detect)
    pub jobs: Option<usize>,
}

/// Languages the client supports.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguagesConfig {
    /// Enabled language names; empty enables all
    pub enabled: Vec<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.resolve.on_duplicate.is_some() {
            self.resolve.on_duplicate = other.resolve.on_duplicate;
        }
        if other.resolve.jobs.is_some() {
            self.resolve.jobs = other.resolve.jobs;
        }

        // Language lists are replaced, not merged
        if !other.languages.enabled.is_empty() {
            self.languages.enabled = other.languages.enabled;
        }
    }

    /// Parse the identity collision policy.
    pub fn duplicate_policy(&self) -> Result<DuplicatePolicy> {
        match &self.resolve.on_duplicate {
            Some(s) => s.parse().map_err(|e: String| anyhow!(e)),
            None => Ok(DuplicatePolicy::default()),
        }
    }

    /// Parse the enabled languages.
    pub fn language_filter(&self) -> Result<LanguageFilter> {
        if self.languages.enabled.is_empty() {
            return Ok(LanguageFilter::all());
        }

        let languages = self
            .languages
            .enabled
            .iter()
            .map(|name| name.parse::<Language>().map_err(|e| anyhow!(e)))
            .collect::<Result<Vec<_>>>()
            .context("invalid `languages.enabled`")?;
        Ok(LanguageFilter::only(languages))
    }

    /// Options for one resolve.
    pub fn resolve_options(&self) -> Result<ResolveOptions> {
        Ok(ResolveOptions {
            on_duplicate: self.duplicate_policy()?,
            languages: self.language_filter()?,
        })
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.targetgraph/config.toml)
/// 2. Global config (~/.targetgraph/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    // Load global config first
    if global_path.exists() {
        let global = Config::load_or_default(global_path);
        config.merge(global);
    }

    // Project config overrides global
    if project_path.exists() {
        let project = Config::load_or_default(project_path);
        config.merge(project);
    }

    config
}

/// Get the global targetgraph config directory (~/.targetgraph).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".targetgraph"))
}

/// Get the project config path (.targetgraph/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".targetgraph").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.resolve.on_duplicate.is_none());
        assert!(config.languages.enabled.is_empty());

        let options = config.resolve_options().unwrap();
        assert_eq!(options.on_duplicate, DuplicatePolicy::Error);
        assert_eq!(options.languages, LanguageFilter::all());
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[resolve]
on_duplicate = "first-wins"
jobs = 8

[languages]
enabled = ["java", "kotlin"]
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.resolve.jobs, Some(8));
        assert_eq!(config.duplicate_policy().unwrap(), DuplicatePolicy::FirstWins);

        let filter = config.language_filter().unwrap();
        assert!(filter.allows(Language::Kotlin));
        assert!(!filter.allows(Language::Scala));
    }

    #[test]
    fn test_config_invalid_values() {
        let mut config = Config::default();
        config.resolve.on_duplicate = Some("last-wins".to_string());
        assert!(config.duplicate_policy().is_err());

        let mut config = Config::default();
        config.languages.enabled = vec!["java".to_string(), "cobol".to_string()];
        assert!(config.language_filter().is_err());
    }

    #[test]
    fn test_config_load_or_default_on_bad_toml() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(&config_path, "[resolve\njobs = ").unwrap();

        let config = Config::load_or_default(&config_path);
        assert!(config.resolve.jobs.is_none());
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config::default();
        base.resolve.on_duplicate = Some("error".to_string());
        base.resolve.jobs = Some(4);

        let mut override_cfg = Config::default();
        override_cfg.resolve.on_duplicate = Some("first-wins".to_string());

        base.merge(override_cfg);

        assert_eq!(base.resolve.on_duplicate, Some("first-wins".to_string()));
        assert_eq!(base.resolve.jobs, Some(4)); // Not overridden
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = tmp.path().join("project.toml");

        std::fs::write(
            &global_path,
            r#"
[resolve]
jobs = 2

[languages]
enabled = ["java"]
"#,
        )
        .unwrap();

        std::fs::write(
            &project_path,
            r#"
[languages]
enabled = ["scala"]
"#,
        )
        .unwrap();

        let config = load_config(&global_path, &project_path);

        assert_eq!(config.resolve.jobs, Some(2));
        assert_eq!(config.languages.enabled, vec!["scala"]);
    }
}
