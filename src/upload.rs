use std::path::Path;

use anyhow::Result;
use lazy_regex::lazy_regex;
use log::{info, warn};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use walkdir::WalkDir;

use crate::context::Context;
use crate::registry::RegistrySnapshot;
use crate::staging::StagedFile;

#[derive(Debug, Deserialize)]
struct UploadEmojiRes {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("still rate-limited after {0} attempts")]
    RateLimitExhausted(u32),
    #[error("platform rejected upload: {0}")]
    Rejected(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub fn target_name(prefix: &str, index: u32) -> String {
    format!("{prefix}_{index}")
}

fn parse_staged_name(file_name: &str) -> Option<(u32, String)> {
    let caps = lazy_regex!(r"^(\d+)\.(\w+)$").captures(file_name)?;
    let index = caps.get(1).unwrap().as_str().parse().ok()?;
    Some((index, caps.get(2).unwrap().as_str().to_string()))
}

/// Collects the staged files, one per regular file named
/// `{index}.{extension}`. Order is not significant, every upload is
/// independent.
pub fn list_staged(dir: &Path) -> Result<Vec<StagedFile>> {
    let mut staged = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().into_owned();
        match parse_staged_name(&file_name) {
            Some((index, extension)) => staged.push(StagedFile {
                path: entry.into_path(),
                index,
                extension,
            }),
            None => warn!("ignoring unexpected file in staging directory: `{file_name}`"),
        }
    }
    Ok(staged)
}

async fn upload_one(ctx: &Context, file: &StagedFile, name: &str) -> Result<(), UploadError> {
    let data = tokio::fs::read(&file.path).await?;
    let url = format!("{}/emoji.add", ctx.cfg.slack_api);

    let mut attempts = 0u32;
    loop {
        // multipart bodies are consumed on send, so the identical form is
        // rebuilt for every attempt
        let form = Form::new()
            .part(
                "image",
                Part::bytes(data.clone()).file_name(file.file_name()),
            )
            .text("mode", "data")
            .text("name", name.to_string())
            .text("token", ctx.cfg.token.clone());

        let res = ctx.client.post(&url).multipart(form).send().await?;

        if res.status() == StatusCode::TOO_MANY_REQUESTS {
            attempts += 1;
            if let Some(max) = ctx.cfg.retry.max_attempts {
                if attempts >= max {
                    return Err(UploadError::RateLimitExhausted(attempts));
                }
            }
            warn!(
                "too many requests, sleeping for {} seconds",
                ctx.cfg.retry.backoff.as_secs()
            );
            tokio::time::sleep(ctx.cfg.retry.backoff).await;
            continue;
        }

        let res: UploadEmojiRes = res.json().await?;
        if !res.ok {
            let reason = res.error.unwrap_or_else(|| "unknown error".to_string());
            return Err(UploadError::Rejected(reason));
        }
        return Ok(());
    }
}

/// Uploads every staged file that isn't already registered. Per-file
/// failures are logged and don't stop the remaining uploads; nothing is
/// rolled back.
pub async fn upload_all(ctx: &Context, staged: &[StagedFile], snapshot: &RegistrySnapshot) {
    for file in staged {
        let name = target_name(&ctx.cfg.prefix, file.index);
        if snapshot.contains(&name) {
            info!("emoji code already exists: {name}");
            continue;
        }

        match upload_one(ctx, file, &name).await {
            Ok(()) => info!("emoji added: {}, {}", name, file.file_name()),
            Err(err) => warn!("couldn't upload `{name}`: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_name_joins_prefix_and_index() {
        assert_eq!(target_name("proj", 5), "proj_5");
        assert_eq!(target_name("proj", 0), "proj_0");
    }

    #[test]
    fn staged_names_parse_index_and_extension() {
        assert_eq!(parse_staged_name("7.png"), Some((7, "png".to_string())));
        assert_eq!(parse_staged_name("007.gif"), Some((7, "gif".to_string())));
        assert_eq!(parse_staged_name("cover.png"), None);
        assert_eq!(parse_staged_name("7"), None);
        assert_eq!(parse_staged_name("7.png.bak"), None);
    }

    #[test]
    fn listing_skips_unexpected_names_and_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("1.png"), b"a").unwrap();
        std::fs::write(dir.path().join("2.gif"), b"b").unwrap();
        std::fs::write(dir.path().join("notes.txt.bak"), b"c").unwrap();
        std::fs::create_dir(dir.path().join("3.png")).unwrap();

        let mut staged = list_staged(dir.path()).unwrap();
        staged.sort_by_key(|file| file.index);

        assert_eq!(staged.len(), 2);
        assert_eq!(staged[0].index, 1);
        assert_eq!(staged[0].extension, "png");
        assert_eq!(staged[1].index, 2);
        assert_eq!(staged[1].extension, "gif");
    }
}
