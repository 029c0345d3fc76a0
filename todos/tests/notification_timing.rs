//! Notification auto-clear timing on a paused tokio clock.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use std::time::Duration;
use todo_sync_runtime::Store;
use todos::{
    MockTodoService, OwnerId, TodoAction, TodoEnvironment, TodoReducer, TodoState, TodoStore,
};
use tokio::time::{Instant, sleep_until};

const OWNER: OwnerId = OwnerId::new(1);

fn store(service: &MockTodoService) -> TodoStore<MockTodoService> {
    Store::new(
        TodoState::new(OWNER),
        TodoReducer::new(),
        TodoEnvironment::new(service.clone()),
    )
}

/// Send and wait for the remote calls the action started
///
/// Only for actions whose direct effects are remote calls or cancels; a
/// validation failure arms its timer directly, so waiting would sleep through it.
async fn send_and_settle(store: &TodoStore<MockTodoService>, action: TodoAction) {
    let mut handle = store.send(action).await.unwrap();
    handle.wait().await;
}

/// Raise "Title should not be empty" without waiting for its timer
async fn raise_validation_error(store: &TodoStore<MockTodoService>) {
    store
        .send(TodoAction::Create {
            title: "   ".to_string(),
        })
        .await
        .unwrap();
}

async fn message(store: &TodoStore<MockTodoService>) -> Option<String> {
    store
        .state(|s| s.notification.message().map(str::to_owned))
        .await
}

#[tokio::test(start_paused = true)]
async fn notification_clears_after_timeout() {
    let service = MockTodoService::new();
    service.fail_fetch();
    let store = store(&service);
    let start = Instant::now();

    send_and_settle(&store, TodoAction::Load).await;
    assert_eq!(message(&store).await.as_deref(), Some("Unable to load todos"));

    sleep_until(start + Duration::from_millis(2900)).await;
    assert!(message(&store).await.is_some());

    sleep_until(start + Duration::from_millis(3001)).await;
    assert_eq!(message(&store).await, None);
}

#[tokio::test(start_paused = true)]
async fn superseding_raise_restarts_timer() {
    let service = MockTodoService::new();
    service.fail_fetch();
    let store = store(&service);
    let start = Instant::now();

    send_and_settle(&store, TodoAction::Load).await;

    sleep_until(start + Duration::from_millis(1000)).await;
    raise_validation_error(&store).await;
    assert_eq!(
        message(&store).await.as_deref(),
        Some("Title should not be empty")
    );

    // The first timer would have fired at 3000 ms
    sleep_until(start + Duration::from_millis(3500)).await;
    assert_eq!(
        message(&store).await.as_deref(),
        Some("Title should not be empty")
    );

    sleep_until(start + Duration::from_millis(4001)).await;
    assert_eq!(message(&store).await, None);
}

#[tokio::test(start_paused = true)]
async fn dismiss_hides_immediately_and_cancels_timer() {
    let service = MockTodoService::new();
    let store = store(&service);
    let start = Instant::now();

    raise_validation_error(&store).await;
    assert!(message(&store).await.is_some());

    sleep_until(start + Duration::from_millis(1000)).await;
    send_and_settle(&store, TodoAction::DismissNotification).await;
    assert_eq!(message(&store).await, None);

    sleep_until(start + Duration::from_millis(2000)).await;
    raise_validation_error(&store).await;

    // Neither the dismissed timer (3000 ms) nor a stale expiry may hide this one
    sleep_until(start + Duration::from_millis(4500)).await;
    assert!(message(&store).await.is_some());

    sleep_until(start + Duration::from_millis(5001)).await;
    assert_eq!(message(&store).await, None);
}

#[tokio::test(start_paused = true)]
async fn custom_timeout_is_honored() {
    let service = MockTodoService::new();
    let store = Store::new(
        TodoState::new(OWNER),
        TodoReducer::new(),
        TodoEnvironment::new(service).with_notification_timeout(Duration::from_millis(500)),
    );
    let start = Instant::now();

    raise_validation_error(&store).await;

    sleep_until(start + Duration::from_millis(400)).await;
    assert!(store.state(|s| s.notification.is_visible()).await);

    sleep_until(start + Duration::from_millis(501)).await;
    assert!(!store.state(|s| s.notification.is_visible()).await);
}

#[tokio::test(start_paused = true)]
async fn shutdown_waits_for_pending_timer() {
    let service = MockTodoService::new();
    let store = store(&service);

    raise_validation_error(&store).await;

    let result = store.shutdown(Duration::from_millis(100)).await;
    assert!(matches!(
        result,
        Err(todo_sync_runtime::StoreError::ShutdownTimeout(1))
    ));
}
