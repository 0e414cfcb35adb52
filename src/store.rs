//! JSON persistence for engine snapshots.

use crate::engine::EngineSnapshot;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot io error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("snapshot encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reads and writes snapshots as pretty-printed JSON files.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotStore;

impl SnapshotStore {
    /// Write `snapshot` to `path`, replacing any previous file.
    ///
    /// The JSON is written to a sibling temp file first and renamed into
    /// place, so readers never see a half-written snapshot.
    pub async fn save(path: &Path, snapshot: &EngineSnapshot) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        let tmp_path = path.with_extension("json.tmp");

        tokio::fs::write(&tmp_path, &bytes)
            .await
            .map_err(|source| StoreError::Io {
                path: tmp_path.clone(),
                source,
            })?;
        if let Err(source) = tokio::fs::rename(&tmp_path, path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }

        tracing::info!(
            "Snapshot written to {} ({} levels, {} trades)",
            path.display(),
            snapshot.levels.len(),
            snapshot.trade_history.len()
        );
        Ok(())
    }

    pub async fn load(path: &Path) -> Result<EngineSnapshot, StoreError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
