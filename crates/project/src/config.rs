use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_OPEN_COMMAND: &str = "CppSolutionExplorer.OpenFile";
pub const DEFAULT_OPEN_TITLE: &str = "Open File";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read explorer config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse explorer config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Settings applied when building and presenting the explorer tree.  
/// 建立與呈現方案總管樹時套用的設定。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    #[serde(default = "default_icon_root")]
    pub icon_root: PathBuf,
    #[serde(default = "default_open_command")]
    pub open_command: String,
    #[serde(default = "default_open_title")]
    pub open_title: String,
}

fn default_icon_root() -> PathBuf {
    PathBuf::from("icons")
}

fn default_open_command() -> String {
    DEFAULT_OPEN_COMMAND.to_string()
}

fn default_open_title() -> String {
    DEFAULT_OPEN_TITLE.to_string()
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            icon_root: default_icon_root(),
            open_command: default_open_command(),
            open_title: default_open_title(),
        }
    }
}

impl ExplorerConfig {
    /// Loads the config, falling back to defaults when the file is absent.  
    /// 載入設定；檔案不存在時回傳預設值。
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: ExplorerConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.sanitize();
        Ok(config)
    }

    pub fn sanitize(&mut self) {
        if self.icon_root.as_os_str().is_empty() {
            self.icon_root = default_icon_root();
        }
        if self.open_command.trim().is_empty() {
            self.open_command = default_open_command();
        }
        if self.open_title.trim().is_empty() {
            self.open_title = default_open_title();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = ExplorerConfig::load(dir.path().join("explorer.json")).unwrap();
        assert_eq!(config, ExplorerConfig::default());
        assert_eq!(config.open_command, "CppSolutionExplorer.OpenFile");
    }

    #[test]
    fn partial_file_keeps_defaults_and_sanitizes_blanks() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("explorer.json");
        fs::write(&path, r#"{ "icon_root": "media/icons", "open_title": "  " }"#).unwrap();

        let config = ExplorerConfig::load(&path).unwrap();
        assert_eq!(config.icon_root, PathBuf::from("media/icons"));
        assert_eq!(config.open_command, DEFAULT_OPEN_COMMAND);
        assert_eq!(config.open_title, DEFAULT_OPEN_TITLE);
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("explorer.json");
        fs::write(&path, "not json").unwrap();
        let err = ExplorerConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
