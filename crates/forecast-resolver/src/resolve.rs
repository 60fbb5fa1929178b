//! Backward-scan resolution of a published run + forecast hour.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use profiler_common::{ModelSpec, ProfileError, ProfileResult, ValidTime};

use crate::store::RemoteStore;

/// Which forecast hour the caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourRequest {
    /// Most recent real-world time covered by confirmed-published data.
    Latest,
    /// A specific forecast hour, validated against the model's hour rule.
    At(u32),
}

/// A confirmed-published run. Immutable once produced.
#[derive(Debug, Clone)]
pub struct ResolvedRun {
    /// The model this run belongs to.
    pub model: ModelSpec,
    /// Run cycle time plus forecast hour.
    pub run: ValidTime,
    /// Artifact path relative to the provider base URL.
    pub remote_path: String,
}

impl ResolvedRun {
    /// The real-world UTC time this forecast field describes.
    pub fn valid_time(&self) -> DateTime<Utc> {
        self.run.valid_datetime()
    }
}

/// Resolve a run for one model, per the requested hour.
pub async fn resolve(
    store: &dyn RemoteStore,
    model: &ModelSpec,
    request: HourRequest,
    now: DateTime<Utc>,
) -> ProfileResult<ResolvedRun> {
    match request {
        HourRequest::At(hour) => {
            if !model.is_legal_hour(hour) {
                return Err(ProfileError::invalid_input(
                    "forecast_hour",
                    format!(
                        "{} does not publish hour {} (max {})",
                        model.id,
                        hour,
                        model.hour_rule.max_hour()
                    ),
                ));
            }
            scan_for_hour(store, model, hour, now)
                .await
                .ok_or_else(|| ProfileError::Unavailable {
                    model: model.id.clone(),
                    forecast_hour: Some(hour),
                })
        }
        HourRequest::Latest => resolve_latest(store, model, now).await,
    }
}

/// Resolve across several models in priority order.
///
/// Models that do not cover the target, or that never publish the
/// requested hour, are skipped without probing. Each remaining model
/// produces its own winner; the globally greatest valid time wins, and
/// ties go to the earlier model in the priority list.
pub async fn resolve_auto(
    store: &dyn RemoteStore,
    models: &[ModelSpec],
    lat: f64,
    lon: f64,
    request: HourRequest,
    now: DateTime<Utc>,
) -> ProfileResult<ResolvedRun> {
    let mut best: Option<ResolvedRun> = None;

    for model in models {
        if !model.coverage.contains(lat, lon) {
            debug!(model = %model.id, "Target outside coverage, skipping");
            continue;
        }
        if let HourRequest::At(hour) = request {
            if !model.is_legal_hour(hour) {
                debug!(model = %model.id, hour, "Hour not published by model, skipping");
                continue;
            }
        }

        let candidate = match request {
            HourRequest::At(hour) => scan_for_hour(store, model, hour, now).await,
            HourRequest::Latest => resolve_latest(store, model, now).await.ok(),
        };

        if let Some(run) = candidate {
            // Strictly greater: an equal valid time keeps the
            // higher-priority model already selected.
            let wins = best
                .as_ref()
                .map_or(true, |b| run.valid_time() > b.valid_time());
            if wins {
                best = Some(run);
            }
        }
    }

    best.ok_or_else(|| ProfileError::Unavailable {
        model: "auto".to_string(),
        forecast_hour: match request {
            HourRequest::At(h) => Some(h),
            HourRequest::Latest => None,
        },
    })
}

/// Find the most recent real-world time covered by confirmed data.
///
/// Confirms available hours in ascending order. Models that publish
/// strictly in order let the scan stop at the first gap; out-of-order
/// models are scanned past gaps up to their probe budget.
async fn resolve_latest(
    store: &dyn RemoteStore,
    model: &ModelSpec,
    now: DateTime<Utc>,
) -> ProfileResult<ResolvedRun> {
    let hours = model.hour_rule.hours();
    let budget = match (model.publishes_in_order, model.latest_scan_limit) {
        (false, Some(limit)) => limit,
        _ => hours.len(),
    };

    let mut best: Option<ResolvedRun> = None;
    for &hour in hours.iter().take(budget) {
        match scan_for_hour(store, model, hour, now).await {
            Some(run) => {
                let vt = run.valid_time();
                if vt <= now {
                    let newer = best.as_ref().map_or(true, |b| vt > b.valid_time());
                    if newer {
                        best = Some(run);
                    }
                }
            }
            None if model.publishes_in_order => break,
            None => continue,
        }
    }

    match best {
        Some(run) => {
            info!(
                model = %model.id,
                run = %run.run,
                "Latest confirmed run selected"
            );
            Ok(run)
        }
        None => Err(ProfileError::Unavailable {
            model: model.id.clone(),
            forecast_hour: None,
        }),
    }
}

/// Scan run cycles backward from now for one that publishes `hour`.
///
/// The first probe success, newest cycle first, wins. Probe errors and
/// timeouts count as "not yet available" and the scan continues; this is
/// the only place transient network failures are swallowed.
async fn scan_for_hour(
    store: &dyn RemoteStore,
    model: &ModelSpec,
    hour: u32,
    now: DateTime<Utc>,
) -> Option<ResolvedRun> {
    for cycle in recent_cycles(model, now) {
        let run = ValidTime::new(cycle, hour);
        let path = model.remote_path(&run);

        match store.exists(&path).await {
            Ok(true) => {
                debug!(model = %model.id, path = %path, "Probe hit");
                return Some(ResolvedRun {
                    model: model.clone(),
                    run,
                    remote_path: path,
                });
            }
            Ok(false) => {
                debug!(model = %model.id, path = %path, "Probe miss");
            }
            Err(e) => {
                debug!(model = %model.id, path = %path, error = %e, "Probe error, treating as unavailable");
            }
        }
    }
    None
}

/// Candidate cycle times, newest first, aligned to the model cadence.
fn recent_cycles(model: &ModelSpec, now: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    let newest = cycle_floor(now, model.cycle_interval_hours);
    (0..model.lookback_cycles)
        .map(|i| newest - Duration::hours((i * model.cycle_interval_hours) as i64))
        .collect()
}

/// Floor a time to the model's cycle cadence (cadences divide 24 h, so
/// epoch alignment lands on the provider's 00/06/12/18-style cycles).
fn cycle_floor(now: DateTime<Utc>, interval_hours: u32) -> DateTime<Utc> {
    let secs = interval_hours as i64 * 3600;
    let floored = now.timestamp().div_euclid(secs) * secs;
    DateTime::from_timestamp(floored, 0).unwrap_or(now)
}
