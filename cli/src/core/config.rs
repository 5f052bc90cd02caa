//! # arcpack Configuration System
//!
//! File: cli/src/core/config.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/arcpack
//!
//! ## Overview
//!
//! Loads the optional defaults used when a flag is not given on the command line:
//! the destination directory and the compression level.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Command-line flags (applied by the command handler, not here)
//! 2. Project-specific `.arcpack.toml` in the current directory or its ancestors
//! 3. User-specific `config.toml` in the platform config directory, or the file
//!    named by the `ARCPACK_CONFIG` environment variable
//! 4. Built-in defaults (current directory, encoder default level)
//!
//! The project search stops at the first directory containing `.git`.
//! Paths are tilde-expanded and the result is validated before use.
//!
//! ## Examples
//!
//! ```toml
//! [archive]
//! path = "~/archives"
//! level = 9
//! ```
//!
//! ```rust
//! let cfg = config::load_config()?;
//! let destination = cfg.archive.path.clone().unwrap_or_else(|| ".".into());
//! ```
//!
use crate::common::archive::validate::MAX_LEVEL;
use crate::common::fs::io;
use crate::core::error::{ArchiverError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit user configuration file.
pub const CONFIG_ENV_VAR: &str = "ARCPACK_CONFIG";

const PROJECT_CONFIG_FILENAME: &str = ".arcpack.toml";

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub archive: ArchiveDefaults,
}

/// Defaults for `arcpack archive`.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ArchiveDefaults {
    /// Destination directory used when `--path` is not given (can use ~).
    pub path: Option<String>,
    /// Compression level used when `--level` is not given.
    pub level: Option<u32>,
}

impl ArchiveDefaults {
    pub fn destination(&self) -> Option<PathBuf> {
        self.path.as_ref().map(PathBuf::from)
    }
}

pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    expand_config_paths(&mut merged_config);
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(explicit) = std::env::var_os(CONFIG_ENV_VAR) {
        let config_path = PathBuf::from(explicit);
        info!(
            "Loading configuration from {}: {}",
            CONFIG_ENV_VAR,
            config_path.display()
        );
        return load_config_from_path(&config_path).map(Some);
    }
    if let Some(proj_dirs) = ProjectDirs::from("com", "arcpack", "arcpack") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file ({}) found.", PROJECT_CONFIG_FILENAME);
        Ok(None)
    }
}

fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = io::read_file_to_string(path)?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project_cfg = match project {
        Some(p) => p,
        None => return user,
    };
    Config {
        archive: ArchiveDefaults {
            path: project_cfg.archive.path.or(user.archive.path),
            level: project_cfg.archive.level.or(user.archive.level),
        },
    }
}

fn expand_config_paths(config: &mut Config) {
    if let Some(path) = &mut config.archive.path {
        let expanded = shellexpand::tilde(path.as_str()).into_owned();
        *path = expanded;
        debug!("Expanded archive destination: {}", path);
    }
}

fn validate_config(config: &Config) -> Result<()> {
    if let Some(level) = config.archive.level {
        if level > MAX_LEVEL {
            return Err(anyhow!(ArchiverError::Config(format!(
                "Invalid compression level {} (expected 0-{}).",
                level, MAX_LEVEL
            ))));
        }
    }
    if let Some(path) = &config.archive.path {
        if path.is_empty() {
            return Err(anyhow!(ArchiverError::Config(
                "Archive path cannot be empty.".to_string()
            )));
        }
        let dest = Path::new(path);
        if dest.exists() && !dest.is_dir() {
            return Err(anyhow!(ArchiverError::Config(format!(
                "Configured archive path '{}' exists but is not a directory.",
                dest.display()
            ))));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_deserialize_basic_toml() {
        let toml_content = r#"
            [archive]
            path = "~/archives"
            level = 7
        "#;
        let config: Config = toml::from_str(toml_content).expect("Failed to parse TOML");
        assert_eq!(config.archive.path.as_deref(), Some("~/archives")); // Not yet expanded
        assert_eq!(config.archive.level, Some(7));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str("[archive]\nformat = \"zip\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_path_expansion() {
        let mut config = Config {
            archive: ArchiveDefaults {
                path: Some("~/bundles".to_string()),
                level: None,
            },
        };
        expand_config_paths(&mut config);
        let home_dir = dirs::home_dir().unwrap();
        assert_eq!(
            config.archive.destination(),
            Some(home_dir.join("bundles"))
        );
    }

    #[test]
    fn test_project_overrides_user() {
        let user = Config {
            archive: ArchiveDefaults {
                path: Some("/user/out".into()),
                level: Some(3),
            },
        };
        let project = Config {
            archive: ArchiveDefaults {
                path: None,
                level: Some(9),
            },
        };
        let merged = merge_configs(user, Some(project));
        assert_eq!(merged.archive.path.as_deref(), Some("/user/out"));
        assert_eq!(merged.archive.level, Some(9));
    }

    #[test]
    fn test_find_project_config_walks_up_until_git() {
        let root = tempdir().unwrap();
        let repo = root.path().join("repo");
        let nested = repo.join("a/b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(repo.join(PROJECT_CONFIG_FILENAME), "[archive]\nlevel = 1\n").unwrap();
        assert_eq!(
            find_project_config_path(&nested),
            Some(repo.join(PROJECT_CONFIG_FILENAME))
        );

        // A .git boundary below the config hides it.
        fs::create_dir(repo.join("a/.git")).unwrap();
        assert_eq!(find_project_config_path(&nested), None);
    }

    #[test]
    fn test_load_config_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[archive]\npath = \"/srv/archives\"\n").unwrap();
        let config = load_config_from_path(&path).unwrap();
        assert_eq!(config.archive.path.as_deref(), Some("/srv/archives"));
        assert_eq!(config.archive.level, None);
    }

    #[test]
    fn test_validate_config_invalid_level() {
        let config = Config {
            archive: ArchiveDefaults {
                path: None,
                level: Some(12),
            },
        };
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Invalid compression level"));
    }

    #[test]
    fn test_validate_config_path_is_file() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("not_a_dir");
        fs::write(&file_path, "").unwrap();
        let config = Config {
            archive: ArchiveDefaults {
                path: Some(file_path.to_string_lossy().to_string()),
                level: None,
            },
        };
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("is not a directory"));
    }
}
