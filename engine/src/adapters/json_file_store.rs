//! JSON file leaderboard store
//!
//! Each leaderboard lives in `<dir>/<name>.json` as an array of export items.
//! Saves write a sibling temp file and rename it over the target, so readers
//! only ever see a complete file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::domain::entities::LeaderboardExportItem;
use crate::domain::ports::LeaderboardStore;
use crate::error::DomainError;

#[derive(Debug, Clone)]
pub struct JsonFileLeaderboardStore {
    dir: PathBuf,
}

impl JsonFileLeaderboardStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    fn temp_path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json.tmp", name))
    }
}

fn storage_error(action: &str, path: &Path, e: impl std::fmt::Display) -> DomainError {
    DomainError::Storage(format!("failed to {} {}: {}", action, path.display(), e))
}

#[async_trait]
impl LeaderboardStore for JsonFileLeaderboardStore {
    async fn load(&self, name: &str) -> Result<Option<Vec<LeaderboardExportItem>>, DomainError> {
        let path = self.path_for(name);
        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No saved leaderboard");
                return Ok(None);
            }
            Err(e) => return Err(storage_error("read", &path, e)),
        };

        let items: Vec<LeaderboardExportItem> =
            serde_json::from_str(&raw).map_err(|e| storage_error("parse", &path, e))?;
        Ok(Some(items))
    }

    async fn save(&self, name: &str, items: &[LeaderboardExportItem]) -> Result<(), DomainError> {
        let path = self.path_for(name);
        let temp_path = self.temp_path_for(name);

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| storage_error("create", &self.dir, e))?;

        let json = serde_json::to_string_pretty(items)
            .map_err(|e| DomainError::Internal(format!("failed to encode {}: {}", name, e)))?;

        fs::write(&temp_path, json)
            .await
            .map_err(|e| storage_error("write", &temp_path, e))?;
        fs::rename(&temp_path, &path)
            .await
            .map_err(|e| storage_error("replace", &path, e))?;

        debug!(path = %path.display(), items = items.len(), "Leaderboard written");
        Ok(())
    }
}
