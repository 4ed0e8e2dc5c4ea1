use std::collections::{HashMap, HashSet};

use anyhow::Result;
use log::info;
use serde::Deserialize;
use simple_error::simple_error;

use crate::context::Context;

#[derive(Debug, Deserialize)]
struct ListEmojiRes {
    ok: bool,
    #[serde(default)]
    emoji: HashMap<String, String>,
    #[serde(default)]
    error: Option<String>,
}

/// Point-in-time view of the emoji names already registered in the
/// workspace. Fetched once per run and never refreshed, so names added by
/// someone else mid-run are not seen.
#[derive(Debug, Default)]
pub struct RegistrySnapshot {
    names: HashSet<String>,
}

impl RegistrySnapshot {
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<String> for RegistrySnapshot {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        RegistrySnapshot {
            names: iter.into_iter().collect(),
        }
    }
}

/// Issues one authenticated `emoji.list` call. Any failure here aborts the
/// run, this is a precondition check rather than a bulk operation.
pub async fn fetch_existing(ctx: &Context) -> Result<RegistrySnapshot> {
    let url = format!("{}/emoji.list", ctx.cfg.slack_api);
    let res: ListEmojiRes = ctx
        .client
        .get(&url)
        .query(&[("token", ctx.cfg.token.as_str())])
        .send()
        .await?
        .json()
        .await?;

    if !res.ok {
        let reason = res.error.unwrap_or_else(|| "unknown error".to_string());
        return Err(simple_error!("emoji.list failed: {}", reason).into());
    }

    info!("workspace currently has {} custom emojis", res.emoji.len());
    Ok(res.emoji.into_keys().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_snapshot_is_empty() {
        let snapshot = RegistrySnapshot::default();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.len(), 0);
        assert!(!snapshot.contains("proj_1"));
    }
}
