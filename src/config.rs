use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use statebind::Features;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "typedstate.toml";

// ============================================================================
// App Config
// ============================================================================

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub features: FeaturesConfig,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeaturesConfig {
    #[serde(default)]
    pub next_major_version: Option<bool>,
}

impl AppConfig {
    /// Load the config file.
    ///
    /// An explicit path must exist. Without one, `./typedstate.toml` is used
    /// if present, otherwise defaults apply.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !path.exists() {
                    log::debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
                    return Ok(Self::default());
                }
                path
            }
        };
        Self::load_from(&path)
    }

    /// Parse a config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid config format in {}", path.display()))?;
        log::debug!("loaded config from {}: {config:?}", path.display());
        Ok(config)
    }

    /// Resolve the feature set for this run.
    ///
    /// Precedence: `--next-major-version`, then the environment, then the
    /// config file. Off by default.
    pub fn features(&self, cli_flag: bool) -> Features {
        if cli_flag {
            return Features::next_major();
        }
        Features::from_env_or(self.file_next_major_version())
    }

    fn file_next_major_version(&self) -> bool {
        self.features.next_major_version.unwrap_or(false)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_features() {
        let file = write_config("[features]\nnext_major_version = true\n");
        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.features.next_major_version, Some(true));
    }

    #[test]
    fn test_empty_file_is_default() {
        let file = write_config("");
        assert_eq!(AppConfig::load_from(file.path()).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let file = write_config("[features]\nnext_major = true\n");
        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid config format"));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(AppConfig::load(Some(missing.as_path())).is_err());
    }

    #[test]
    fn test_feature_precedence() {
        let on = AppConfig {
            features: FeaturesConfig {
                next_major_version: Some(true),
            },
        };
        let unset = AppConfig::default();

        assert!(unset.features(true).next_major_version);
        assert!(on.file_next_major_version());
        assert!(!unset.file_next_major_version());

        if std::env::var_os(statebind::features::ENV_NEXT_MAJOR_VERSION).is_none() {
            assert!(on.features(false).next_major_version);
            assert!(!unset.features(false).next_major_version);
        }
    }
}
