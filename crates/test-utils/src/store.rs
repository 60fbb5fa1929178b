//! In-memory remote store for resolver scenarios.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use forecast_resolver::RemoteStore;
use profiler_common::{ProfileError, ProfileResult};

/// A simulated provider exposing a fixed set of artifact paths.
///
/// Probes against `error_paths` fail with a transport error (which the
/// resolver must treat as a negative probe); fetches of `fail_fetch`
/// paths fail after a successful probe (a `TransferFailure` scenario).
#[derive(Default)]
pub struct MockRemoteStore {
    available: HashSet<String>,
    error_paths: HashSet<String>,
    fail_fetch: HashSet<String>,
    probes: Mutex<Vec<String>>,
}

impl MockRemoteStore {
    pub fn new(paths: impl IntoIterator<Item = String>) -> Self {
        Self {
            available: paths.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Make probes of `path` return a transport error.
    pub fn with_probe_error(mut self, path: impl Into<String>) -> Self {
        self.error_paths.insert(path.into());
        self
    }

    /// Make fetches of `path` fail even though probes succeed.
    pub fn with_fetch_failure(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.available.insert(path.clone());
        self.fail_fetch.insert(path);
        self
    }

    /// Paths probed so far, in order.
    pub fn probed(&self) -> Vec<String> {
        self.probes.lock().expect("probe log poisoned").clone()
    }

    pub fn probe_count(&self) -> usize {
        self.probes.lock().expect("probe log poisoned").len()
    }
}

#[async_trait]
impl RemoteStore for MockRemoteStore {
    async fn exists(&self, path: &str) -> ProfileResult<bool> {
        self.probes
            .lock()
            .expect("probe log poisoned")
            .push(path.to_string());
        if self.error_paths.contains(path) {
            return Err(ProfileError::Http(format!("simulated timeout for {}", path)));
        }
        Ok(self.available.contains(path))
    }

    async fn fetch(&self, path: &str, dest: &Path) -> ProfileResult<u64> {
        if self.fail_fetch.contains(path) || !self.available.contains(path) {
            return Err(ProfileError::TransferFailure {
                url: path.to_string(),
                message: "simulated transfer failure".to_string(),
            });
        }
        let payload = format!("GRIB2-TEST:{}", path);
        tokio::fs::write(dest, payload.as_bytes()).await?;
        Ok(payload.len() as u64)
    }
}
