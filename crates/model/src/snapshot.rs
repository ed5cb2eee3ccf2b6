use std::fs;
use std::io;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entity::Project;

/// A solution as handed over by the loader: its name plus ordered projects.  
/// 由載入器提供的方案快照：名稱與有序的專案清單。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SolutionSnapshot {
    pub name: String,
    #[serde(default)]
    pub projects: Vec<Arc<Project>>,
}

impl SolutionSnapshot {
    pub fn new(name: impl Into<String>, projects: Vec<Arc<Project>>) -> Self {
        Self {
            name: name.into(),
            projects,
        }
    }
}

/// Reads `SolutionSnapshot` JSON documents from disk.  
/// 從磁碟讀取 `SolutionSnapshot` JSON 文件。
#[derive(Debug)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the snapshot, returning `Ok(None)` when the file is absent.  
    /// 載入快照；若檔案不存在則回傳 `Ok(None)`。
    pub fn load(&self) -> Result<Option<SolutionSnapshot>, SnapshotError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let snapshot = serde_json::from_str(&contents)
                    .map_err(|err| SnapshotError::Invalid(err.to_string()))?;
                Ok(Some(snapshot))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(SnapshotError::Io(err)),
        }
    }
}

/// Errors emitted by [`SnapshotStore`].  
/// [`SnapshotStore`] 可能拋出的錯誤。
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("solution snapshot IO error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid solution snapshot payload: {0}")]
    Invalid(String),
}
