//! Feed loading
//!
//! Reads every configured document concurrently, then hands the parsed rows
//! to a [`RankingsContext`].

use anyhow::{Context, Result};
use futures::future::try_join_all;
use player_rankings::feed::{snapshot_from_str, updates_from_str};
use player_rankings::{RankingsConfig, RankingsContext, RawRecord, UpdateRow};
use std::path::Path;
use tracing::info;

async fn read_document(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path).await.with_context(|| format!("Failed to read {}", path.display()))
}

async fn load_snapshot(feed: &str, path: &Path) -> Result<Vec<RawRecord>> {
    let json = read_document(path).await?;
    let rows = snapshot_from_str(feed, &json)
        .with_context(|| format!("Failed to parse {} snapshot {}", feed, path.display()))?;

    info!("Loaded {} {} rows from {}", rows.len(), feed, path.display());
    Ok(rows)
}

async fn load_updates(path: &Path) -> Result<Vec<UpdateRow>> {
    let json = read_document(path).await?;
    let feed = path.display().to_string();
    let rows =
        updates_from_str(&feed, &json).with_context(|| format!("Failed to parse update feed {}", feed))?;

    info!("Loaded {} update rows from {}", rows.len(), feed);
    Ok(rows)
}

/// Load the baseline, current and update documents named in the config
pub async fn load_context(config: &RankingsConfig) -> Result<RankingsContext> {
    let feeds = &config.feeds;

    let (baseline, current, updates) = tokio::try_join!(
        load_snapshot("baseline", &feeds.baseline),
        load_snapshot("current", &feeds.current),
        try_join_all(feeds.updates.iter().map(|path| load_updates(path))),
    )?;

    Ok(RankingsContext::new(baseline, current).with_updates(updates))
}
