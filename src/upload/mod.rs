use std::path::{Path, PathBuf};
use anyhow::Result;
use tokio::fs;
use tracing::{info, warn};
use uuid::Uuid;

/// A file staged from an inbound upload. Owned by exactly one request;
/// the pipeline removes it once the job has produced its outcome.
#[derive(Debug)]
pub struct StagedUpload {
    path: PathBuf,
    field: String,
    size: u64,
    removed: bool,
}

impl StagedUpload {
    /// Write an uploaded part to a collision-resistant location under `dir`.
    pub async fn stage(dir: &Path, field: &str, data: &[u8]) -> Result<Self> {
        fs::create_dir_all(dir).await?;

        let path = dir.join(format!("upload-{}", Uuid::new_v4()));
        fs::write(&path, data).await?;
        info!(
            "Staged {} byte upload from field '{}' at {}",
            data.len(),
            field,
            path.display()
        );

        Ok(Self {
            path,
            field: field.to_string(),
            size: data.len() as u64,
            removed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Best-effort removal of the staged file. Idempotent: the second and
    /// later calls are no-ops. A removal failure is logged and never
    /// surfaces into the job outcome.
    pub async fn remove(&mut self) {
        if self.removed {
            return;
        }
        self.removed = true;

        match fs::remove_file(&self.path).await {
            Ok(()) => info!("Removed staged upload {}", self.path.display()),
            Err(e) => warn!(
                "Failed to remove staged upload {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}
