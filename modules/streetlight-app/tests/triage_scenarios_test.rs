//! Triage scenarios across the queue and detail view-models.
//!
//! Boundary assumption: the server's queue sort key is not observable from
//! this side, so these tests only assert that the returned order is
//! preserved verbatim — never what that order should be.

use std::sync::Arc;

use streetlight_app::queue::Phase;
use streetlight_app::testing::{sample_cell, sample_client, sample_queue_item, MockApi};
use streetlight_app::{ClientDetail, DetailPhase, NewClient, TriageQueue};
use streetlight_common::classify::UrgencyTier;
use streetlight_common::types::{Contact, ContactOutcome, NeedFlag};
use streetlight_common::StreetlightError;

#[tokio::test]
async fn refresh_replaces_the_list_and_is_idempotent() {
    let api = Arc::new(MockApi::new().on_queue(vec![
        sample_queue_item(1, 82.0),
        sample_queue_item(2, 10.0),
    ]));
    let mut queue = TriageQueue::new(api);

    queue.refresh().await.unwrap();
    let first: Vec<i64> = queue.items().iter().map(|i| i.client_id).collect();

    // Unchanged server state: a second refresh shows the same list.
    queue.refresh().await.unwrap();
    let second: Vec<i64> = queue.items().iter().map(|i| i.client_id).collect();
    assert_eq!(first, second);
    // Server order preserved, not re-sorted by score.
    assert_eq!(first, vec![1, 2]);
    assert_eq!(queue.phase(), Phase::Loaded);
}

#[tokio::test]
async fn failed_refresh_keeps_the_stale_list() {
    let api = Arc::new(MockApi::new().on_queue(vec![sample_queue_item(1, 30.0)]));
    let mut queue = TriageQueue::new(api.clone());
    queue.refresh().await.unwrap();
    assert_eq!(queue.items().len(), 1);

    let api_failing = Arc::new(MockApi::new().failing("queue"));
    let mut stale = TriageQueue::new(api_failing);
    stale.refresh().await.unwrap_err();
    assert_eq!(stale.phase(), Phase::Errored);

    // Same instance: load once, then fail — the last-known list survives.
    let flaky = Arc::new(MockApi::new().on_queue(vec![sample_queue_item(7, 55.0)]));
    let mut queue = TriageQueue::new(flaky.clone());
    queue.refresh().await.unwrap();
    flaky.fail("queue");
    let err = queue.refresh().await.unwrap_err();
    assert!(matches!(err, StreetlightError::Network(_)));
    assert_eq!(queue.items().len(), 1);
    assert_eq!(queue.items()[0].client_id, 7);
    assert!(queue.last_error().is_some());
}

#[tokio::test]
async fn empty_display_name_never_reaches_the_network() {
    let api = Arc::new(MockApi::new());
    let mut queue = TriageQueue::new(api.clone());

    let err = queue
        .add_client(NewClient::builder().display_name("   ").build())
        .await
        .unwrap_err();
    assert!(matches!(err, StreetlightError::Validation(_)));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn add_client_refreshes_so_metrics_come_from_the_server() {
    let api = Arc::new(MockApi::new());
    let mut queue = TriageQueue::new(api.clone());

    queue
        .add_client(
            NewClient::builder()
                .display_name("John D.")
                .neighborhood("City Heights")
                .need_food(true)
                .need_housing(true)
                .build(),
        )
        .await
        .unwrap();

    assert_eq!(api.calls(), vec!["create_client", "queue"]);
    assert_eq!(queue.items().len(), 1);
    let item = &queue.items()[0];
    // Server-derived, not locally guessed.
    assert!(item.never_contacted());
    assert_eq!(item.needs_count, 2);
}

#[tokio::test]
async fn queue_row_scenario_critical_and_overdue() {
    let mut item = sample_queue_item(1, 82.0);
    item.follow_up_at = Some("2020-01-01T00:00:00".to_string());
    let api = Arc::new(MockApi::new().on_queue(vec![item]));
    let mut queue = TriageQueue::new(api);
    queue.refresh().await.unwrap();

    let rows = queue.rows();
    assert_eq!(rows[0].tier, UrgencyTier::Critical);
    assert!(rows[0].overdue);

    let summary = queue.summary();
    assert_eq!(summary.total, 1);
    assert_eq!(summary.critical, 1);
    assert_eq!(summary.high, 1);
    assert_eq!(summary.overdue, 1);
}

#[tokio::test]
async fn context_failure_does_not_block_the_detail_load() {
    let api = Arc::new(
        MockApi::new()
            .on_detail(
                sample_client(5, "Maria G."),
                vec![Contact {
                    id: 1,
                    contacted_at: "2026-08-20T10:00:00".to_string(),
                    outcome: ContactOutcome::Reached,
                    note: None,
                }],
            )
            .failing("context"),
    );
    let mut detail = ClientDetail::new(api, 5);

    detail.load().await.unwrap();
    assert_eq!(detail.phase(), DetailPhase::Ready);
    assert_eq!(detail.client().unwrap().display_name, "Maria G.");
    assert_eq!(detail.contacts().len(), 1);
    // Context is supplementary: shown as absent, not as a failure.
    assert!(detail.nearest_hotspot().is_none());
    assert!(detail.last_error().is_none());
}

#[tokio::test]
async fn detail_load_populates_context_when_available() {
    let api = Arc::new(
        MockApi::new()
            .on_detail(sample_client(5, "Maria G."), vec![])
            .on_context(5, sample_cell(9, Some((32.74, -117.08)), 8.5)),
    );
    let mut detail = ClientDetail::new(api, 5);
    detail.load().await.unwrap();
    assert_eq!(detail.nearest_hotspot().unwrap().id, 9);
}

#[tokio::test]
async fn staged_needs_survive_a_failed_save_for_retry() {
    let api = Arc::new(
        MockApi::new()
            .on_detail(sample_client(5, "Maria G."), vec![])
            .failing("update_plan"),
    );
    let mut detail = ClientDetail::new(api.clone(), 5);
    detail.load().await.unwrap();

    assert!(!detail.client().unwrap().need(NeedFlag::Food));
    detail.toggle_need(NeedFlag::Food);
    detail.save_plan().await.unwrap_err();

    // Optimistic edit still staged; no re-entry needed before retry.
    assert!(detail.client().unwrap().need(NeedFlag::Food));
    assert!(!detail.saving());

    api.recover("update_plan");
    detail.save_plan().await.unwrap();
    assert!(detail.client().unwrap().need(NeedFlag::Food));
}

#[tokio::test]
async fn save_plan_replaces_local_state_with_the_server_record() {
    let api = Arc::new(MockApi::new().on_detail(sample_client(5, "Maria G."), vec![]));
    let mut detail = ClientDetail::new(api.clone(), 5);
    detail.load().await.unwrap();

    detail.toggle_need(NeedFlag::Therapy);
    detail.follow_up_tomorrow();
    detail.save_plan().await.unwrap();

    let client = detail.client().unwrap();
    assert!(client.need(NeedFlag::Therapy));
    assert!(client.follow_up_at.is_some());
    assert!(detail.follow_up().is_some());
    // Context re-fetched after the save.
    let calls = api.calls();
    assert_eq!(calls.last().unwrap(), "context:5");

    detail.clear_follow_up();
    detail.save_plan().await.unwrap();
    assert!(detail.client().unwrap().follow_up_at.is_none());
    assert!(detail.follow_up().is_none());
}

#[tokio::test]
async fn logging_no_answer_triggers_a_full_reload() {
    let api = Arc::new(MockApi::new().on_detail(sample_client(5, "Maria G."), vec![]));
    let mut detail = ClientDetail::new(api.clone(), 5);
    detail.load().await.unwrap();
    assert!(detail.contacts().is_empty());

    detail.log_no_answer().await.unwrap();

    // The shown history is the server's, not a local append: the reload
    // happened after the write.
    let calls = api.calls();
    let log_pos = calls.iter().position(|c| c == "log_contact:5").unwrap();
    let detail_fetches: Vec<usize> = calls
        .iter()
        .enumerate()
        .filter(|(_, c)| *c == "detail:5")
        .map(|(i, _)| i)
        .collect();
    assert!(detail_fetches.iter().any(|i| *i > log_pos));

    assert_eq!(detail.contacts().len(), 1);
    assert_eq!(detail.contacts()[0].outcome, ContactOutcome::NoAnswer);
    assert!(!detail.saving());
}
