//! Application configuration.
//!
//! Loaded once at startup from `~/.config/notefind/config.yaml`:
//!
//! ```yaml
//! root_path: /home/alice/notes
//! extensions: [".md", ".txt"]
//! editor: nvim
//! ```
//!
//! Only `root_path` is required, and it can also be supplied with `--root`.
//! `extensions` defaults to `[".md"]`; `editor` falls back to `$EDITOR`,
//! then `vi`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::debug;

const DEFAULT_EDITOR: &str = "vi";

/// Resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the notes tree to scan and index.
    pub root_path: PathBuf,
    /// Allowed file extensions, each including the leading dot. Matching is
    /// case-sensitive on the full suffix.
    pub extensions: Vec<String>,
    /// Command used to open a note in an external editor.
    pub editor: String,
}

/// On-disk shape; every field optional so CLI overrides can fill gaps.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    root_path: Option<PathBuf>,
    extensions: Option<Vec<String>>,
    editor: Option<String>,
}

fn default_extensions() -> Vec<String> {
    vec![".md".to_string()]
}

fn default_editor() -> String {
    env::var("EDITOR").unwrap_or_else(|_| DEFAULT_EDITOR.to_string())
}

/// Default config file location (`~/.config/notefind/config.yaml`).
pub fn default_config_path() -> Result<PathBuf> {
    let config_base = dirs::config_dir().context("Failed to get platform config directory")?;
    Ok(config_base.join("notefind").join("config.yaml"))
}

impl Config {
    /// Load configuration, merging the config file with CLI overrides.
    ///
    /// A missing config file is fine as long as `--root` supplies the notes
    /// root; a present but unparsable file is an error.
    pub fn load(config_path: Option<&Path>, root_override: Option<PathBuf>) -> Result<Self> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => default_config_path()?,
        };

        let file = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_yaml::from_str::<ConfigFile>(&content)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        } else {
            debug!(path = %path.display(), "config file not found, using defaults");
            ConfigFile::default()
        };

        let root_path = match root_override.or(file.root_path) {
            Some(root) => root,
            None => bail!(
                "no notes root configured; set root_path in {} or pass --root",
                path.display()
            ),
        };

        Ok(Self {
            root_path,
            extensions: file.extensions.unwrap_or_else(default_extensions),
            editor: file.editor.unwrap_or_else(default_editor),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_load_full_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "root_path: /home/alice/notes\nextensions: [\".md\", \".txt\"]\neditor: nvim\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.root_path, PathBuf::from("/home/alice/notes"));
        assert_eq!(config.extensions, vec![".md", ".txt"]);
        assert_eq!(config.editor, "nvim");
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "root_path: /home/alice/notes\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.extensions, vec![".md"]);
        assert!(!config.editor.is_empty());
    }

    #[test]
    fn test_root_override_wins_over_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "root_path: /home/alice/notes\n").unwrap();

        let config = Config::load(Some(&path), Some(PathBuf::from("/tmp/other"))).unwrap();
        assert_eq!(config.root_path, PathBuf::from("/tmp/other"));
    }

    #[test]
    fn test_missing_file_without_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("does-not-exist.yaml");

        let result = Config::load(Some(&path), None);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("no notes root configured"));
    }

    #[test]
    fn test_missing_file_with_root_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("does-not-exist.yaml");

        let config = Config::load(Some(&path), Some(PathBuf::from("/tmp/notes"))).unwrap();
        assert_eq!(config.root_path, PathBuf::from("/tmp/notes"));
        assert_eq!(config.extensions, vec![".md"]);
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "root_path: [unclosed\n").unwrap();

        assert!(Config::load(Some(&path), None).is_err());
    }
}
