use std::{env, fs, path::PathBuf};

use crate::prelude::*;
use crate::tree::RenderLimits;
use nestify::nest;
use serde::{Deserialize, Serialize};

nest! {
    #[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]*
    #[serde(rename_all = "kebab-case", default)]*
    /// Persistent configuration for pstree.
    ///
    /// Stored in `~/.config/pstree/config.yaml`; every key is optional. Display switches set here
    /// are combined with the ones given on the command line.
    pub struct PstreeConfig {
        pub limits: RenderLimits,
        pub display: pub struct DisplayConfig {
            pub show_id: bool,
            pub group_threads: bool,
            pub show_state: bool,
        },
    }
}

/// Get the path to the configuration file, following the XDG Base Directory Specification
/// at https://specifications.freedesktop.org/basedir-spec/basedir-spec-latest.html
///
/// If config_name is None, returns ~/.config/pstree/config.yaml (default)
/// If config_name is Some, returns ~/.config/pstree/{config_name}.yaml
fn get_configuration_file_path(config_name: Option<&str>) -> Result<PathBuf> {
    let config_dir = match env::var("XDG_CONFIG_HOME") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = env::var("HOME").context("Neither XDG_CONFIG_HOME nor HOME is set")?;
            PathBuf::from(home).join(".config")
        }
    };
    let config_dir = config_dir.join("pstree");

    Ok(match config_name {
        Some(name) => config_dir.join(format!("{name}.yaml")),
        None => config_dir.join("config.yaml"),
    })
}

impl PstreeConfig {
    /// Load the configuration. If it does not exist, return a default configuration.
    pub fn load(config_name: Option<&str>) -> Result<Self> {
        let config_path = get_configuration_file_path(config_name)?;

        match fs::read(&config_path) {
            Ok(config_str) => {
                let config: PstreeConfig = serde_yaml::from_slice(&config_str).context(format!(
                    "Failed to parse pstree config at {}",
                    config_path.display()
                ))?;
                debug!("Config loaded from {}", config_path.display());
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Config file not found at {}", config_path.display());
                Ok(PstreeConfig::default())
            }
            Err(e) => bail!("Failed to load config: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::DEFAULT_CAPACITY;
    use std::path::Path;

    fn write_config(root: &Path, name: &str, content: &str) {
        let dir = root.join("pstree");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_missing_config_is_default() {
        let tmp = tempfile::tempdir().unwrap();
        temp_env::with_var("XDG_CONFIG_HOME", Some(tmp.path()), || {
            let config = PstreeConfig::load(None).unwrap();
            assert_eq!(config, PstreeConfig::default());
            assert_eq!(config.limits.max_depth, DEFAULT_CAPACITY);
        });
    }

    #[test]
    fn test_partial_config() {
        let tmp = tempfile::tempdir().unwrap();
        write_config(
            tmp.path(),
            "config.yaml",
            "limits:\n  max-depth: 8\ndisplay:\n  group-threads: true\n",
        );

        temp_env::with_var("XDG_CONFIG_HOME", Some(tmp.path()), || {
            let config = PstreeConfig::load(None).unwrap();
            assert_eq!(config.limits.max_depth, 8);
            assert_eq!(config.limits.max_groups, DEFAULT_CAPACITY);
            assert!(config.display.group_threads);
            assert!(!config.display.show_id);
        });
    }

    #[test]
    fn test_named_config() {
        let tmp = tempfile::tempdir().unwrap();
        write_config(tmp.path(), "crash.yaml", "display:\n  show-state: true\n");

        temp_env::with_var("XDG_CONFIG_HOME", Some(tmp.path()), || {
            assert!(PstreeConfig::load(Some("crash")).unwrap().display.show_state);
            assert!(!PstreeConfig::load(None).unwrap().display.show_state);
        });
    }

    #[test]
    fn test_malformed_config_mentions_path() {
        let tmp = tempfile::tempdir().unwrap();
        write_config(tmp.path(), "config.yaml", "limits: [not, a, map]\n");

        temp_env::with_var("XDG_CONFIG_HOME", Some(tmp.path()), || {
            let err = PstreeConfig::load(None).unwrap_err();
            assert!(err.to_string().starts_with("Failed to parse pstree config at"));
        });
    }
}
