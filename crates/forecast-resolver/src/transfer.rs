//! Artifact transfer with caller-decided cache reuse.
//!
//! Downloaded artifacts are cached keyed by model + run date + file name.
//! Reuse of a cached artifact is the caller's decision: [`cached_artifact`]
//! surfaces the cached file and its age, it never refreshes silently.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::Duration;
use tracing::{info, warn};

use profiler_common::{ProfileError, ProfileResult};

use crate::resolve::ResolvedRun;
use crate::store::RemoteStore;

/// A previously downloaded artifact found in the cache.
#[derive(Debug, Clone)]
pub struct CachedArtifact {
    pub path: PathBuf,
    /// Time since the file was written. Staleness is surfaced, not acted on.
    pub age: Duration,
    pub size_bytes: u64,
}

/// Cache file name for a run: `{model}.{date}.{remote file name}`.
///
/// The provider's file names omit the run date, so the date goes into the
/// key to keep runs from different days distinct.
pub fn cache_file_name(run: &ResolvedRun) -> String {
    let file = run
        .remote_path
        .rsplit('/')
        .next()
        .unwrap_or(run.remote_path.as_str());
    format!("{}.{}.{}", run.model.id, run.run.cycle_date(), file)
}

/// Look up a cached artifact for this run, if one exists.
pub fn cached_artifact(cache_dir: &Path, run: &ResolvedRun) -> Option<CachedArtifact> {
    let path = cache_dir.join(cache_file_name(run));
    let meta = std::fs::metadata(&path).ok()?;

    let age = meta
        .modified()
        .ok()
        .and_then(|mtime| SystemTime::now().duration_since(mtime).ok())
        .and_then(|d| Duration::from_std(d).ok())
        .unwrap_or_else(Duration::zero);

    Some(CachedArtifact {
        path,
        age,
        size_bytes: meta.len(),
    })
}

/// Download a resolved run's artifact into the cache directory.
///
/// Availability can go stale between the resolution probe and this call,
/// so existence is re-checked first: a vanished artifact is `Unavailable`
/// again, while a failure after the re-check confirms it is a
/// `TransferFailure` (retryable, or fall back to cache).
pub async fn download(
    store: &dyn RemoteStore,
    run: &ResolvedRun,
    cache_dir: &Path,
) -> ProfileResult<PathBuf> {
    tokio::fs::create_dir_all(cache_dir).await?;

    let still_there = match store.exists(&run.remote_path).await {
        Ok(present) => present,
        Err(e) => {
            warn!(path = %run.remote_path, error = %e, "Pre-transfer probe failed");
            false
        }
    };
    if !still_there {
        return Err(ProfileError::Unavailable {
            model: run.model.id.clone(),
            forecast_hour: Some(run.run.forecast_hour),
        });
    }

    let final_path = cache_dir.join(cache_file_name(run));
    let temp_path = cache_dir.join(format!("{}.partial", cache_file_name(run)));

    let bytes = store.fetch(&run.remote_path, &temp_path).await?;
    tokio::fs::rename(&temp_path, &final_path).await?;

    info!(
        model = %run.model.id,
        run = %run.run,
        path = %final_path.display(),
        bytes,
        "Artifact downloaded"
    );
    Ok(final_path)
}
