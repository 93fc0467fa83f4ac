//! Application configuration for cratemaker.
//!
//! User config lives at `~/.cratemaker/cratemaker.toml`.
//! CLI flags and environment variables override config file values, which
//! override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CrateMakerError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "cratemaker.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".cratemaker";

// ---------------------------------------------------------------------------
// Config structs (matching cratemaker.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// File names and fixed literals.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Where published projects live.
    #[serde(default)]
    pub repository: RepositoryConfig,

    /// Notebook embedding settings.
    #[serde(default)]
    pub notebooks: NotebooksConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Template configuration file read by `extract` and `create`.
    #[serde(default = "default_input_file")]
    pub input_file: String,

    /// Hand-off file written by `extract`.
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,

    /// Version stamped on a freshly generated project crate.
    #[serde(default = "default_crate_version")]
    pub crate_version: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            input_file: default_input_file(),
            metadata_file: default_metadata_file(),
            crate_version: default_crate_version(),
        }
    }
}

fn default_input_file() -> String {
    "cookiecutter.json".into()
}
fn default_metadata_file() -> String {
    "metadata.json".into()
}
fn default_crate_version() -> String {
    "0.0.0".into()
}

/// `[repository]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Hosting service the repository identifier is resolved against.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "https://github.com".into()
}

/// `[notebooks]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotebooksConfig {
    /// Key under the notebook's `metadata` block that receives the crate.
    #[serde(default = "default_metadata_key")]
    pub metadata_key: String,
}

impl Default for NotebooksConfig {
    fn default() -> Self {
        Self {
            metadata_key: default_metadata_key(),
        }
    }
}

fn default_metadata_key() -> String {
    "ro-crate".into()
}

impl RepositoryConfig {
    /// Build the published URL of a repository identifier such as
    /// `owner/name`.
    pub fn repository_url(&self, repository: &str) -> Result<String> {
        let repository = repository.trim().trim_matches('/');
        if repository.is_empty() {
            return Err(CrateMakerError::config("repository identifier is empty"));
        }

        let mut base = Url::parse(&self.base_url).map_err(|e| {
            CrateMakerError::config(format!("invalid repository base_url '{}': {e}", self.base_url))
        })?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let url = base.join(repository).map_err(|e| {
            CrateMakerError::config(format!("invalid repository identifier '{repository}': {e}"))
        })?;
        Ok(url.to_string())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.cratemaker/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CrateMakerError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.cratemaker/cratemaker.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CrateMakerError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        CrateMakerError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| CrateMakerError::write(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| CrateMakerError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| CrateMakerError::write(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("cookiecutter.json"));
        assert!(toml_str.contains("ro-crate"));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[repository]
base_url = "https://gitlab.example.org"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.repository.base_url, "https://gitlab.example.org");
        assert_eq!(config.defaults.crate_version, "0.0.0");
        assert_eq!(config.notebooks.metadata_key, "ro-crate");
    }

    #[test]
    fn repository_url_joins_identifier() {
        let repo = RepositoryConfig::default();
        assert_eq!(
            repo.repository_url("octo/analysis").unwrap(),
            "https://github.com/octo/analysis"
        );
    }

    #[test]
    fn repository_url_keeps_base_path() {
        let repo = RepositoryConfig {
            base_url: "https://git.example.org/groups".into(),
        };
        assert_eq!(
            repo.repository_url("/octo/analysis/").unwrap(),
            "https://git.example.org/groups/octo/analysis"
        );
    }

    #[test]
    fn repository_url_rejects_empty_identifier() {
        let err = RepositoryConfig::default().repository_url("  ").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn load_missing_config_file_is_not_found() {
        let err = load_config_from(Path::new("/definitely/not/here/cratemaker.toml")).unwrap_err();
        assert!(matches!(err, CrateMakerError::NotFound { .. }));
    }
}
