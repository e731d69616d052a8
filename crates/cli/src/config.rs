//! Optional project configuration read from `restygen.toml`.
//!
//! ```toml
//! [output]
//! dir = "src/main/generated"
//!
//! [log]
//! filter = "restygen_core=debug"
//! ```
//!
//! Every key is optional. Command-line flags take precedence over the file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

/// Config filename looked up in the working directory.
pub const CONFIG_FILENAME: &str = "restygen.toml";
/// Output directory used when neither the flag nor the file sets one.
pub const DEFAULT_OUT_DIR: &str = "generated";

/// Parsed configuration file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// `[output]` table.
    #[serde(default)]
    pub output: OutputConfig,
    /// `[log]` table.
    #[serde(default)]
    pub log: LogConfig,
}

/// Where artifacts are written.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Root directory of the generated source tree.
    pub dir: Option<PathBuf>,
}

/// Logging overrides.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Level or filter spec, same syntax as `RESTYGEN_LOG`.
    pub filter: Option<String>,
}

impl Config {
    /// Parse a config document.
    pub fn from_toml(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|err| format!("Failed to parse config file: {err}"))
    }

    /// Load `explicit` if given (it must exist), otherwise `restygen.toml`
    /// in the working directory if present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, String> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = PathBuf::from(CONFIG_FILENAME);
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };

        let contents = fs::read_to_string(&path)
            .map_err(|err| format!("Failed to read config file {}: {err}", path.display()))?;
        let config = Self::from_toml(&contents)?;
        debug!(path = %path.display(), "Loaded config file.");
        Ok(config)
    }

    /// Output directory: `flag`, else the file's `[output] dir`, else
    /// [`DEFAULT_OUT_DIR`].
    pub fn out_dir(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.output.dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.out_dir(None), PathBuf::from("generated"));
        assert_eq!(config.log.filter, None);
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_toml(
            r#"
[output]
dir = "src/main/generated"

[log]
filter = "debug"
"#,
        )
        .unwrap();
        assert_eq!(config.out_dir(None), PathBuf::from("src/main/generated"));
        assert_eq!(config.log.filter.as_deref(), Some("debug"));
    }

    #[test]
    fn test_flag_overrides_file() {
        let config = Config::from_toml("[output]\ndir = \"from-file\"\n").unwrap();
        assert_eq!(
            config.out_dir(Some(Path::new("from-flag"))),
            PathBuf::from("from-flag")
        );
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = Config::from_toml("[output]\ndirectory = \"x\"\n").unwrap_err();
        assert!(err.starts_with("Failed to parse config file"));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[log]\nfilter = \"restygen_core=trace\"\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.log.filter.as_deref(), Some("restygen_core=trace"));
    }
}
