//! Forecast availability resolution and artifact transfer.
//!
//! NWP providers publish run cycles with a lag that varies by model and
//! forecast hour, so "what is available right now" can only be answered by
//! probing. This crate scans run cycles backward from now, newest first,
//! with short per-probe timeouts; probe failures count as "not yet
//! available", never as fatal errors. Resolution yields a [`ResolvedRun`]
//! identifier only; transfer is a separate step that re-checks existence
//! immediately before downloading.

pub mod resolve;
pub mod store;
pub mod transfer;

pub use resolve::{resolve, resolve_auto, HourRequest, ResolvedRun};
pub use store::{HttpStore, RemoteStore};
pub use transfer::{cached_artifact, download, CachedArtifact};
