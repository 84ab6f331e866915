//! End-to-end tests driving a whole dialog session: task selection seeding
//! reconciliation and rules, counter refreshes and bulk execution.
mod common;
use common::*;
use jikko::prelude::*;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

struct Fixture {
    mock: Arc<MockDataClient>,
    session: TaskSession,
    notifications: tokio::sync::mpsc::UnboundedReceiver<Notification>,
    reload_count: Arc<AtomicUsize>,
}

fn fixture() -> Fixture {
    let mock = Arc::new(MockDataClient::with_count(4));
    let (notifier, notifications) = Notifier::channel();
    let reload_count = Arc::new(AtomicUsize::new(0));
    let reload_hits = Arc::clone(&reload_count);
    let reload: ReloadFn = Arc::new(move || {
        reload_hits.fetch_add(1, Ordering::SeqCst);
    });
    let session = TaskSession::with_debounce(
        sample_bucket(),
        sample_catalog(),
        Arc::clone(&mock) as Arc<dyn DataClient>,
        notifier,
        reload,
        Duration::from_millis(1000),
    );
    Fixture {
        mock,
        session,
        notifications,
        reload_count,
    }
}

#[tokio::test(start_paused = true)]
async fn test_open_seeds_class_properties_and_counts_everything() {
    let mut fx = fixture();
    fx.session.open().unwrap();

    let state = fx.session.state();
    assert_eq!(state.properties, class_properties());
    assert!(state.actions.is_none());
    assert_eq!(state.logic, None);
    assert!(state.tree.is_empty());

    tokio::time::sleep(Duration::from_millis(1500)).await;
    let calls = fx.mock.count_calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, None);
    drop(calls);
    assert_eq!(fx.session.match_count(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_selecting_task_with_filter_seeds_everything() {
    let mut fx = fixture();
    fx.session.open().unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;

    // Task 5 references filter 7 (status == "open").
    fx.session.select_task(5).unwrap();

    let state = fx.session.state();

    // Reconciled properties: class ∪ task ∪ filter, deduplicated by path.
    let paths: Vec<&str> = state.properties.iter().map(|p| p.path.as_str()).collect();
    assert_eq!(paths, vec!["$.status", "$.quantity", "$.grade", "$.note"]);

    // The tree reproduces the filter's stored logic exactly.
    let filter_logic = LogicExpression::new(json!({"==": [{"var": "$.status"}, "open"]}));
    assert_eq!(state.logic.as_ref(), Some(&filter_logic));
    assert_eq!(
        state.tree,
        RuleNode::condition("$.status", Operator::Equal, Some(json!("open")))
    );

    // The seeded action came from the task.
    assert!(matches!(
        state.actions,
        Some(ActionDescriptor::Mutate { .. })
    ));

    // The recount went out with that same logic.
    tokio::time::sleep(Duration::from_millis(1500)).await;
    let calls = fx.mock.count_calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].0.as_ref(), Some(&filter_logic));
}

#[tokio::test(start_paused = true)]
async fn test_selecting_task_without_filter_starts_matching_all() {
    let mut fx = fixture();
    fx.session.open().unwrap();
    fx.session.select_task(6).unwrap();

    let state = fx.session.state();
    assert_eq!(state.actions, Some(ActionDescriptor::Remove));
    assert_eq!(state.logic, None);
    assert!(state.tree.is_empty());
    assert_eq!(state.properties, class_properties());
}

#[tokio::test(start_paused = true)]
async fn test_selecting_unknown_task_or_filter_fails() {
    let mut fx = fixture();
    fx.session.open().unwrap();
    assert_eq!(
        fx.session.select_task(99),
        Err(SelectError::TaskNotFound(99))
    );
}

#[tokio::test(start_paused = true)]
async fn test_rule_edits_only_recount_on_real_changes() {
    let mut fx = fixture();
    fx.session.open().unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(fx.mock.count_call_count(), 1);

    let tree = RuleNode::and(vec![RuleNode::condition(
        "$.quantity",
        Operator::Greater,
        Some(json!(5)),
    )]);
    fx.session.rules_changed(tree.clone());
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(fx.mock.count_call_count(), 2);

    // The same tree again leaves the logic untouched: no new query.
    fx.session.rules_changed(tree);
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(fx.mock.count_call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_edit_referencing_missing_field_is_dropped() {
    let mut fx = fixture();
    fx.session.open().unwrap();

    fx.session.rules_changed(RuleNode::and(vec![RuleNode::condition(
        "$.vanished",
        Operator::Equal,
        Some(json!(1)),
    )]));

    // The condition was dropped, so the predicate stays empty.
    assert_eq!(fx.session.state().logic, None);
    assert!(fx.session.state().tree.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_execute_remove_end_to_end() {
    let mut fx = fixture();
    fx.session.open().unwrap();
    fx.session.select_task(6).unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    let counts_before = fx.mock.count_call_count();

    let outcome = fx.session.execute().await;

    assert_eq!(
        outcome,
        ExecutionOutcome::Completed {
            message: "Removed 3 data row(s)".to_string()
        }
    );
    assert_eq!(fx.mock.delete_calls.lock().unwrap().len(), 1);
    assert_eq!(fx.reload_count.load(Ordering::SeqCst), 1);

    // Exactly one recount triggered by the execution.
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(fx.mock.count_call_count(), counts_before + 1);

    let notification = fx.notifications.try_recv().unwrap();
    assert_eq!(notification.severity, Severity::Success);
    assert_eq!(notification.title, "Removed 3 data row(s)");
}

#[tokio::test(start_paused = true)]
async fn test_execute_without_action_is_informational() {
    let mut fx = fixture();
    fx.session.open().unwrap();

    let outcome = fx.session.execute().await;

    assert_eq!(outcome, ExecutionOutcome::NoModification);
    assert!(fx.mock.delete_calls.lock().unwrap().is_empty());
    assert!(fx.mock.update_calls.lock().unwrap().is_empty());

    let notification = fx.notifications.try_recv().unwrap();
    assert_eq!(notification.severity, Severity::Info);
}

#[tokio::test(start_paused = true)]
async fn test_closed_session_stops_counting() {
    let mut fx = fixture();
    fx.session.open().unwrap();
    fx.session.close();

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(fx.mock.count_call_count(), 0);
}
