//! Repository configuration
//!
//! Values come from built-in defaults, then an optional TOML file, then the
//! environment:
//!
//! - `BITSIM_DEFAULT_BRANCH`: branch created by `init`
//! - `BITSIM_INITIAL_MESSAGE`: message of the root commit
//!
//! ```toml
//! default_branch = "main"
//! initial_message = "Initial commit"
//!
//! [initial_files]
//! "README.md" = "# Project\n"
//! ```

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::Snapshot;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BRANCH_ENV: &str = "BITSIM_DEFAULT_BRANCH";
pub const INITIAL_MESSAGE_ENV: &str = "BITSIM_INITIAL_MESSAGE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepositoryConfig {
    pub default_branch: String,
    pub initial_message: String,
    /// Working tree recorded by the root commit
    pub initial_files: Snapshot,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        RepositoryConfig {
            default_branch: "main".to_string(),
            initial_message: "Initial commit".to_string(),
            initial_files: Snapshot::from([("README.md".to_string(), "# Project\n".to_string())]),
        }
    }
}

impl RepositoryConfig {
    /// Defaults, overlaid with `path` when given, overlaid with the environment
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config
            .with_overrides(|key| std::env::var(key).ok())
            .validate()
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides looked up by environment variable name
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(default_branch) = lookup(DEFAULT_BRANCH_ENV) {
            self.default_branch = default_branch;
        }
        if let Some(initial_message) = lookup(INITIAL_MESSAGE_ENV) {
            self.initial_message = initial_message;
        }
        self
    }

    pub fn validate(self) -> anyhow::Result<Self> {
        self.default_branch_name()
            .context("invalid default_branch in configuration")?;
        anyhow::ensure!(
            !self.initial_message.trim().is_empty(),
            "initial_message must not be empty"
        );
        Ok(self)
    }

    pub fn default_branch_name(&self) -> crate::error::Result<BranchName> {
        BranchName::try_parse(self.default_branch.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = RepositoryConfig::from_toml("default_branch = \"trunk\"").unwrap();

        assert_eq!(config.default_branch, "trunk");
        assert_eq!(config.initial_message, "Initial commit");
        assert!(config.initial_files.contains_key("README.md"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(RepositoryConfig::from_toml("colour = \"blue\"").is_err());
    }

    #[test]
    fn environment_overrides_file_values() {
        let config = RepositoryConfig::default().with_overrides(|key| match key {
            DEFAULT_BRANCH_ENV => Some("develop".to_string()),
            _ => None,
        });

        assert_eq!(config.default_branch, "develop");
        assert_eq!(config.initial_message, "Initial commit");
    }

    #[test]
    fn invalid_default_branch_fails_validation() {
        let config = RepositoryConfig {
            default_branch: "bad..name".to_string(),
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn loads_initial_files_from_disk() -> anyhow::Result<()> {
        let dir = assert_fs::TempDir::new()?;
        let file = dir.child("bitsim.toml");
        file.write_str(
            "initial_message = \"Start\"\n\n[initial_files]\n\"a.txt\" = \"x\"\n\"b.txt\" = \"y\"\n",
        )?;

        let config = RepositoryConfig::from_file(file.path())?;

        assert_eq!(config.initial_message, "Start");
        assert_eq!(config.initial_files.len(), 2);
        assert_eq!(config.initial_files.get("a.txt").map(String::as_str), Some("x"));

        Ok(())
    }
}
