//! Resolver scenarios against a simulated remote store.

use chrono::{TimeZone, Utc};
use forecast_resolver::{cached_artifact, download, resolve, resolve_auto, HourRequest};
use profiler_common::model::catalog;
use profiler_common::ProfileError;
use test_utils::MockRemoteStore;

fn hrrr_path(date: &str, cycle: &str, fh: u32) -> String {
    format!(
        "hrrr/prod/hrrr.{date}/conus/hrrr.t{cycle}z.wrfsfcf{fh:02}.grib2"
    )
}

fn gfs_path(date: &str, cycle: &str, fh: u32) -> String {
    format!("gfs/prod/gfs.{date}/{cycle}/atmos/gfs.t{cycle}z.pgrb2.0p25.f{fh:03}")
}

/// Store exposing only hours {0, 1, 2} of the 10z HRRR run.
fn hrrr_store_with_three_hours() -> MockRemoteStore {
    MockRemoteStore::new((0..=2).map(|fh| hrrr_path("20240301", "10", fh)))
}

// ============================================================================
// Hourly model, hours {0,1,2} published
// ============================================================================

#[tokio::test]
async fn test_latest_picks_newest_covered_time() {
    let store = hrrr_store_with_three_hours();
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();

    let run = resolve(&store, &catalog::hrrr(), HourRequest::Latest, now)
        .await
        .unwrap();

    assert_eq!(run.run.forecast_hour, 2);
    assert_eq!(
        run.run.reference_time,
        Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
    );
    // valid time = run time + 2h
    assert_eq!(
        run.valid_time(),
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    );
}

#[tokio::test]
async fn test_in_order_scan_stops_at_first_gap() {
    let store = hrrr_store_with_three_hours();
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();

    resolve(&store, &catalog::hrrr(), HourRequest::Latest, now)
        .await
        .unwrap();

    // Hour 3 was probed (the gap), hour 4 must not have been.
    let probed = store.probed();
    assert!(probed.iter().any(|p| p.contains("f03")));
    assert!(!probed.iter().any(|p| p.contains("f04")));
}

#[tokio::test]
async fn test_explicit_hour_resolves_against_older_cycle() {
    let store = hrrr_store_with_three_hours();
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();

    let run = resolve(&store, &catalog::hrrr(), HourRequest::At(2), now)
        .await
        .unwrap();

    assert_eq!(run.run.forecast_hour, 2);
    assert_eq!(
        run.valid_time(),
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    );
    assert_eq!(
        run.remote_path,
        "hrrr/prod/hrrr.20240301/conus/hrrr.t10z.wrfsfcf02.grib2"
    );
}

#[tokio::test]
async fn test_unpublished_hour_is_unavailable() {
    let store = hrrr_store_with_three_hours();
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();

    let err = resolve(&store, &catalog::hrrr(), HourRequest::At(5), now)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ProfileError::Unavailable {
            forecast_hour: Some(5),
            ..
        }
    ));
}

#[tokio::test]
async fn test_illegal_hour_rejected_before_any_probe() {
    let store = hrrr_store_with_three_hours();
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();

    let err = resolve(&store, &catalog::hrrr(), HourRequest::At(19), now)
        .await
        .unwrap_err();

    assert!(matches!(err, ProfileError::InvalidInput { .. }));
    assert_eq!(store.probe_count(), 0);
}

#[tokio::test]
async fn test_probe_error_counts_as_negative_not_fatal() {
    // The newest cycle times out; the scan must continue to the hit.
    let store = MockRemoteStore::new([hrrr_path("20240301", "10", 0)])
        .with_probe_error(hrrr_path("20240301", "12", 0));
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();

    let run = resolve(&store, &catalog::hrrr(), HourRequest::At(0), now)
        .await
        .unwrap();
    assert_eq!(
        run.run.reference_time,
        Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
    );
}

// ============================================================================
// Out-of-order publication (GFS)
// ============================================================================

#[tokio::test]
async fn test_out_of_order_scan_continues_past_gaps() {
    // 00z run published hours 0, 3 and 9 but not 6.
    let store = MockRemoteStore::new(
        [0u32, 3, 9]
            .into_iter()
            .map(|fh| gfs_path("20240301", "00", fh)),
    );
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();

    let run = resolve(&store, &catalog::gfs(), HourRequest::Latest, now)
        .await
        .unwrap();

    // Hour 9 (valid 09z) wins even though hour 6 is missing.
    assert_eq!(run.run.forecast_hour, 9);
    assert_eq!(
        run.valid_time(),
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    );
}

// ============================================================================
// Auto mode
// ============================================================================

#[tokio::test]
async fn test_auto_prefers_priority_model_on_tie() {
    // HRRR and RAP both expose their 12z analysis: equal valid times.
    let store = MockRemoteStore::new([
        hrrr_path("20240301", "12", 0),
        "rap/prod/rap.20240301/rap.t12z.awp130pgrbf00.grib2".to_string(),
    ]);
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();

    let run = resolve_auto(
        &store,
        &catalog::auto_priority(),
        32.22,
        -110.94,
        HourRequest::Latest,
        now,
    )
    .await
    .unwrap();

    assert_eq!(run.model.id, "hrrr");
}

#[tokio::test]
async fn test_auto_picks_globally_newest_valid_time() {
    // HRRR stalled at the 10z analysis; RAP already has 12z.
    let store = MockRemoteStore::new([
        hrrr_path("20240301", "10", 0),
        "rap/prod/rap.20240301/rap.t12z.awp130pgrbf00.grib2".to_string(),
    ]);
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();

    let run = resolve_auto(
        &store,
        &catalog::auto_priority(),
        32.22,
        -110.94,
        HourRequest::Latest,
        now,
    )
    .await
    .unwrap();

    assert_eq!(run.model.id, "rap");
    assert_eq!(
        run.valid_time(),
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    );
}

#[tokio::test]
async fn test_auto_skips_models_that_do_not_cover_target() {
    let store = MockRemoteStore::new(Vec::<String>::new());
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();

    // Honolulu: outside HRRR/RAP coverage, only GFS is probed.
    let err = resolve_auto(
        &store,
        &catalog::auto_priority(),
        21.3,
        -157.86,
        HourRequest::Latest,
        now,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ProfileError::Unavailable { .. }));
    assert!(store.probed().iter().all(|p| p.starts_with("gfs/")));
}

#[tokio::test]
async fn test_auto_explicit_hour_succeeds_like_spec_scenario() {
    let store = hrrr_store_with_three_hours();
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();

    let run = resolve_auto(
        &store,
        &catalog::auto_priority(),
        32.22,
        -110.94,
        HourRequest::At(2),
        now,
    )
    .await
    .unwrap();
    assert_eq!(
        run.valid_time(),
        run.run.reference_time + chrono::Duration::hours(2)
    );

    let err = resolve_auto(
        &store,
        &catalog::auto_priority(),
        32.22,
        -110.94,
        HourRequest::At(5),
        now,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ProfileError::Unavailable { .. }));
}

// ============================================================================
// Transfer
// ============================================================================

#[tokio::test]
async fn test_download_writes_cache_keyed_artifact() {
    let store = hrrr_store_with_three_hours();
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
    let run = resolve(&store, &catalog::hrrr(), HourRequest::At(2), now)
        .await
        .unwrap();

    let cache = tempfile::tempdir().unwrap();
    assert!(cached_artifact(cache.path(), &run).is_none());

    let path = download(&store, &run, cache.path()).await.unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "hrrr.20240301.hrrr.t10z.wrfsfcf02.grib2"
    );

    let cached = cached_artifact(cache.path(), &run).unwrap();
    assert_eq!(cached.path, path);
    assert!(cached.size_bytes > 0);
    assert!(cached.age >= chrono::Duration::zero());
}

#[tokio::test]
async fn test_stale_artifact_is_unavailable_again() {
    let store = hrrr_store_with_three_hours();
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
    let run = resolve(&store, &catalog::hrrr(), HourRequest::At(2), now)
        .await
        .unwrap();

    // The provider rotated its directory between probe and transfer.
    let gone = MockRemoteStore::new(Vec::<String>::new());
    let cache = tempfile::tempdir().unwrap();
    let err = download(&gone, &run, cache.path()).await.unwrap_err();
    assert!(matches!(err, ProfileError::Unavailable { .. }));
}

#[tokio::test]
async fn test_failed_fetch_after_probe_is_transfer_failure() {
    let path = hrrr_path("20240301", "10", 2);
    let store = MockRemoteStore::new([
        hrrr_path("20240301", "10", 0),
        hrrr_path("20240301", "10", 1),
    ])
    .with_fetch_failure(path);
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
    let run = resolve(&store, &catalog::hrrr(), HourRequest::At(2), now)
        .await
        .unwrap();

    let cache = tempfile::tempdir().unwrap();
    let err = download(&store, &run, cache.path()).await.unwrap_err();
    assert!(matches!(err, ProfileError::TransferFailure { .. }));
}
