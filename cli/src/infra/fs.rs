//! Filesystem infrastructure: implements `ArtifactStore`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::ArtifactStore;
use crate::domain::DownloadedFile;

/// Moves staged downloads into a local output directory.
#[derive(Debug, Default)]
pub struct LocalArtifactStore;

impl ArtifactStore for LocalArtifactStore {
    async fn persist(
        &self,
        download: &DownloadedFile,
        output_dir: &Path,
        file_name: &str,
    ) -> Result<PathBuf> {
        tokio::fs::create_dir_all(output_dir)
            .await
            .with_context(|| format!("creating output directory {}", output_dir.display()))?;
        let dest = output_dir.join(file_name);

        if tokio::fs::rename(&download.staged_path, &dest).await.is_ok() {
            return Ok(dest);
        }

        // Different filesystem: copy beside the target, then swap in.
        let partial = output_dir.join(format!(".{file_name}.part"));
        if let Err(e) = copy_into_place(&download.staged_path, &partial, &dest).await {
            if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
                tracing::debug!(error = %cleanup, "partial download not removed");
            }
            return Err(e);
        }
        if let Err(e) = tokio::fs::remove_file(&download.staged_path).await {
            tracing::debug!(error = %e, "staged download not removed");
        }
        Ok(dest)
    }

    async fn file_size(&self, path: &Path) -> Result<u64> {
        let metadata = tokio::fs::metadata(path)
            .await
            .with_context(|| format!("reading metadata of {}", path.display()))?;
        Ok(metadata.len())
    }
}

async fn copy_into_place(staged: &Path, partial: &Path, dest: &Path) -> Result<()> {
    tokio::fs::copy(staged, partial)
        .await
        .with_context(|| format!("copying {} to {}", staged.display(), partial.display()))?;
    tokio::fs::rename(partial, dest)
        .await
        .with_context(|| format!("moving download into {}", dest.display()))
}
