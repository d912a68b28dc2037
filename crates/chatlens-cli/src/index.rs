//! Concurrent chronological indexing.
//!
//! Each archive is opened on the blocking pool independently; the only
//! ordering applied is the final chronological sort.

use anyhow::{Context, Result};
use chatlens_core::{build_chrono_index, emit_archive_indexed, ChronoEntry};
use chatlens_store::{resolve_archive_location, ArchiveCatalog, ArchiveFile};
use tokio::task::JoinSet;

/// Discover archives through `catalog` and order them chronologically.
pub async fn build_index<C: ArchiveCatalog>(catalog: &C) -> Result<Vec<ChronoEntry>> {
    let files = catalog
        .list_archive_locations()
        .context("failed to discover archives")?;
    index_files(files).await
}

/// Resolve `files` concurrently, then sort.
pub async fn index_files(files: Vec<ArchiveFile>) -> Result<Vec<ChronoEntry>> {
    let mut tasks = JoinSet::new();
    for file in files {
        tasks.spawn_blocking(move || resolve_archive_location(&file));
    }

    let mut locations = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        locations.push(joined.context("archive resolution task failed")?);
    }

    let entries = build_chrono_index(locations);
    emit_archive_indexed(&entries);
    Ok(entries)
}
