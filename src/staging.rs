use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use bytes::Bytes;
use log::{info, warn};

use crate::context::Context;
use crate::scrape::EmojiAsset;

/// One downloaded image inside the staging directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub path: PathBuf,
    pub index: u32,
    pub extension: String,
}

impl StagedFile {
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.index, self.extension)
    }
}

/// Scratch directory owned by a single run. Removed on drop no matter how
/// the run ends.
#[derive(Debug)]
pub struct StagingDir {
    path: PathBuf,
}

impl StagingDir {
    /// Creates a fresh directory under the current working directory. The
    /// name embeds the process id and a timestamp, so two runs never fight
    /// over the same directory.
    pub fn prepare() -> Result<StagingDir> {
        let root = std::env::current_dir()?;
        Self::prepare_in(&root)
    }

    pub fn prepare_in(root: &Path) -> Result<StagingDir> {
        let ts = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        let path = root.join(format!("emojis_{}_{}", std::process::id(), ts));
        std::fs::create_dir(&path)?;
        info!("staging downloads in `{}`", path.display());
        Ok(StagingDir { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fetches one asset into the staging directory. Failures are returned
    /// to the caller, which skips the asset rather than aborting the run.
    pub async fn download(&self, ctx: &Context, asset: &EmojiAsset) -> Result<StagedFile> {
        let data: Bytes = ctx
            .client
            .get(&asset.source_url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let path = self.path.join(asset.file_name());
        tokio::fs::write(&path, &data).await?;
        info!("downloaded `{}` ({} bytes)", asset.file_name(), data.len());

        Ok(StagedFile {
            path,
            index: asset.index,
            extension: asset.extension.clone(),
        })
    }
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_dir_all(&self.path) {
            warn!(
                "couldn't remove staging directory `{}`: {err}",
                self.path.display()
            );
        }
    }
}
