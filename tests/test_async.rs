//! Async front end tests: timeout, cancellation and the in-flight guard.
//!
//! Run with `cargo test --features async`.

#![cfg(feature = "async")]

mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;

use common::FixtureSource;
use income_explorer::{AsyncController, DataFetchError, FilterSpec, SortKey};

#[tokio::test]
async fn load_installs_records() {
    let controller = AsyncController::new(FixtureSource::ok(common::sample_records()));
    let state = controller.load().await.unwrap();
    assert_eq!(state.visible().len(), 3);
    assert!(controller.errors().is_empty());
    assert!(!controller.is_busy());
}

#[tokio::test]
async fn failed_load_records_one_error() {
    let controller = AsyncController::new(FixtureSource::failing(500));
    let state = controller.load().await.unwrap();
    assert!(state.visible().is_empty());
    assert_eq!(controller.errors().len(), 1);
}

#[tokio::test]
async fn slow_fetch_times_out() {
    let controller = AsyncController::new(
        FixtureSource::ok(common::sample_records()).delayed(Duration::from_millis(500)),
    )
    .with_timeout(Duration::from_millis(50));

    let state = controller.load().await.unwrap();
    assert!(state.visible().is_empty());
    let errors = controller.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("timed out"), "{}", errors[0].message);
    // The abandoned upstream call is still sleeping.
    assert!(controller.is_busy());
}

#[tokio::test]
async fn cancelled_fetch_leaves_state_untouched() {
    let controller = AsyncController::new(
        FixtureSource::ok(common::sample_records()).delayed(Duration::from_millis(500)),
    );

    let err = controller
        .load_until(tokio::time::sleep(Duration::from_millis(20)))
        .await
        .unwrap_err();
    assert!(matches!(err, DataFetchError::Cancelled));
    assert!(controller.state().original().is_empty());
    assert!(controller.errors().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn second_trigger_while_in_flight_is_rejected() {
    let source = FixtureSource::ok(common::sample_records())
        .remote()
        .delayed(Duration::from_millis(200));
    let calls = source.calls.clone();
    let controller = AsyncController::new(source);

    let (first, second) = tokio::join!(controller.load(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        controller
            .submit_filter(FilterSpec::new().start_year(2022))
            .await
    });

    assert_eq!(first.unwrap().visible().len(), 3);
    assert!(matches!(second.unwrap_err(), DataFetchError::Busy));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(controller.errors().is_empty());
}

#[tokio::test]
async fn local_filter_and_sort_do_not_fetch() {
    let source = FixtureSource::ok(common::sample_records());
    let calls = source.calls.clone();
    let controller = AsyncController::new(source);
    controller.load().await.unwrap();

    let state = controller
        .submit_filter(FilterSpec::new().start_year(2022))
        .await
        .unwrap();
    assert_eq!(state.visible().len(), 2);

    let state = controller.click_column(SortKey::Revenue);
    assert_eq!(common::revenues(state.visible()), [383285.0, 394328.0]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn local_filter_submitted_during_load_is_kept() {
    let controller = AsyncController::new(
        FixtureSource::ok(common::sample_records()).delayed(Duration::from_millis(200)),
    );

    let (loaded, submitted) = tokio::join!(controller.load(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        controller
            .submit_filter(FilterSpec::new().start_year(2022))
            .await
    });

    assert_eq!(submitted.unwrap().filter().start_year, Some(2022));
    let loaded = loaded.unwrap();
    assert_eq!(loaded.filter().start_year, Some(2022));
    assert_eq!(loaded.original().len(), 3);
    assert_eq!(common::dates(loaded.visible()), ["2022-09-24", "2023-09-30"]);
    assert_eq!(controller.state(), loaded);
}

#[tokio::test]
async fn retrigger_after_cancel_waits_for_upstream_call() {
    let source = FixtureSource::ok(common::sample_records()).delayed(Duration::from_millis(300));
    let calls = source.calls.clone();
    let controller = AsyncController::new(source);

    let err = controller
        .load_until(tokio::time::sleep(Duration::from_millis(20)))
        .await
        .unwrap_err();
    assert!(matches!(err, DataFetchError::Cancelled));

    assert!(controller.is_busy());
    let retry = controller.load().await;
    assert!(matches!(retry.unwrap_err(), DataFetchError::Busy));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(!controller.is_busy());
    let state = controller.load().await.unwrap();
    assert_eq!(state.visible().len(), 3);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(controller.errors().is_empty());
}

#[tokio::test]
async fn retrigger_after_timeout_waits_for_upstream_call() {
    let source = FixtureSource::ok(common::sample_records()).delayed(Duration::from_millis(300));
    let calls = source.calls.clone();
    let controller = AsyncController::new(source).with_timeout(Duration::from_millis(50));

    let state = controller.load().await.unwrap();
    assert!(state.visible().is_empty());
    assert_eq!(controller.errors().len(), 1);

    let retry = controller.load().await;
    assert!(matches!(retry.unwrap_err(), DataFetchError::Busy));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(!controller.is_busy());
    // The late result was dropped, not installed.
    assert!(controller.state().original().is_empty());
}

#[tokio::test]
async fn panicking_fetch_is_recorded_as_task_failure() {
    let controller = AsyncController::new(FixtureSource::ok(common::sample_records()).panicking());

    let state = controller.load().await.unwrap();
    assert!(state.visible().is_empty());
    let errors = controller.errors();
    assert_eq!(errors.len(), 1);
    assert!(
        errors[0].message.starts_with("Fetch task failed"),
        "{}",
        errors[0].message
    );
    assert!(!controller.is_busy());
}
