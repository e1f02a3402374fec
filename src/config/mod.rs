mod schema;

pub use schema::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/classe-diag/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("classe-diag"))
}

/// Get the default config file path (~/.config/classe-diag/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path and falls back
///   to the built-in defaults when that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed or has unknown fields
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    Ok(config)
}

fn expand_home(path: &str) -> Result<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => {
            let home = dirs::home_dir().context("Could not determine home directory")?;
            Ok(home.join(rest))
        }
        None => Ok(Path::new(path).to_path_buf()),
    }
}

impl Config {
    /// Directory backing the key/value store.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => expand_home(dir),
            None => Ok(get_config_dir()?.join("data")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_missing_explicit_file_is_error() {
        let path = env::temp_dir().join("classe_diag_test_config_missing.yaml");
        let _ = fs::remove_file(&path);

        let result = load_config(Some(path));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_load_explicit_file() {
        let path = env::temp_dir().join("classe_diag_test_config_load.yaml");
        fs::write(&path, "data_dir: /var/lib/classe\n").unwrap();

        let config = load_config(Some(path.clone())).unwrap();
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/var/lib/classe"));
        assert_eq!(config.colors, None);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let path = env::temp_dir().join("classe_diag_test_config_invalid.yaml");
        fs::write(&path, "colors: [not, a, bool\n").unwrap();

        assert!(load_config(Some(path.clone())).is_err());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_default_data_dir() {
        let config = Config::default();
        let dir = config.data_dir().unwrap();
        assert!(dir.ends_with(".config/classe-diag/data"));
    }

    #[test]
    fn test_tilde_data_dir_expands() {
        let config = Config {
            data_dir: Some("~/classe".to_string()),
            colors: None,
        };
        let dir = config.data_dir().unwrap();
        assert!(dir.is_absolute());
        assert!(dir.ends_with("classe"));
    }
}
