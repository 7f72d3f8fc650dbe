// Behavior tests for the theme preference store: initialization, ambient
// following while auto, subscription teardown, and persistence semantics.
use facility_hub::testing::MemoryPreferenceStorage;
use facility_hub::theme::{PreferenceStorage, ThemePreference, ThemeStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Wait for the resolved watch channel to observe `expected`
async fn wait_for_resolved(rx: &mut watch::Receiver<bool>, expected: bool) {
    tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            if *rx.borrow_and_update() == expected {
                return;
            }
            rx.changed().await.expect("resolved channel closed");
        }
    })
    .await
    .expect("resolved value never reached expected state");
}

#[tokio::test]
async fn initialize_reads_persisted_preference() {
    let storage = Arc::new(MemoryPreferenceStorage::with_value("dark"));
    let (_ambient_tx, ambient_rx) = watch::channel(false);

    let store = ThemeStore::initialize(storage, ambient_rx);
    assert_eq!(store.preference(), ThemePreference::Dark);
    assert!(store.resolved_is_dark());
}

#[tokio::test]
async fn initialize_adopts_ambient_when_nothing_persisted() {
    let storage = Arc::new(MemoryPreferenceStorage::empty());
    let (_ambient_tx, ambient_rx) = watch::channel(true);

    let store = ThemeStore::initialize(storage, ambient_rx);
    // Adopted as an explicit preference, not as auto
    assert_eq!(store.preference(), ThemePreference::Dark);
    assert!(store.resolved_is_dark());
}

#[tokio::test]
async fn auto_follows_ambient_changes_without_further_calls() {
    let storage = Arc::new(MemoryPreferenceStorage::empty());
    let (ambient_tx, ambient_rx) = watch::channel(false);

    let mut store =
        ThemeStore::initialize(Arc::clone(&storage) as Arc<dyn PreferenceStorage>, ambient_rx);
    store.set_preference(ThemePreference::Auto).await;
    assert!(!store.resolved_is_dark());

    let mut resolved = store.subscribe_resolved();
    ambient_tx.send(true).unwrap();
    wait_for_resolved(&mut resolved, true).await;
    assert!(store.resolved_is_dark());

    ambient_tx.send(false).unwrap();
    wait_for_resolved(&mut resolved, false).await;
    assert!(!store.resolved_is_dark());
}

#[tokio::test]
async fn explicit_preference_freezes_resolved_value() {
    let storage = Arc::new(MemoryPreferenceStorage::empty());
    let (ambient_tx, ambient_rx) = watch::channel(false);

    let mut store = ThemeStore::initialize(storage, ambient_rx);
    store.set_preference(ThemePreference::Auto).await;

    let mut resolved = store.subscribe_resolved();
    ambient_tx.send(true).unwrap();
    wait_for_resolved(&mut resolved, true).await;

    // Moving away from auto tears the subscription down
    store.set_preference(ThemePreference::Light).await;
    assert!(!store.resolved_is_dark());

    // Subsequent ambient changes no longer affect the resolved value
    ambient_tx.send(false).unwrap();
    ambient_tx.send(true).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!store.resolved_is_dark());
    assert_eq!(store.preference(), ThemePreference::Light);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn explicit_preference_outlives_in_flight_ambient_updates() {
    let storage = Arc::new(MemoryPreferenceStorage::empty());
    let (ambient_tx, ambient_rx) = watch::channel(false);

    let mut store = ThemeStore::initialize(storage, ambient_rx);

    // Race the follower against the freeze: an ambient change landing while
    // the preference moves away from auto must never overwrite the frozen
    // value, even once the follower has had time to run.
    for _ in 0..100 {
        store.set_preference(ThemePreference::Auto).await;
        ambient_tx.send(true).unwrap();
        store.set_preference(ThemePreference::Light).await;
        assert!(!store.resolved_is_dark());

        tokio::task::yield_now().await;
        assert!(!store.resolved_is_dark());
        ambient_tx.send(false).unwrap();
    }
}

#[tokio::test]
async fn set_preference_persists_and_is_idempotent() {
    let storage = Arc::new(MemoryPreferenceStorage::empty());
    let (_ambient_tx, ambient_rx) = watch::channel(false);

    let mut store =
        ThemeStore::initialize(Arc::clone(&storage) as Arc<dyn PreferenceStorage>, ambient_rx);

    store.set_preference(ThemePreference::Dark).await;
    assert_eq!(storage.stored().as_deref(), Some("dark"));
    assert!(store.resolved_is_dark());

    // Repeating the same selection changes nothing
    store.set_preference(ThemePreference::Dark).await;
    assert_eq!(storage.stored().as_deref(), Some("dark"));
    assert!(store.resolved_is_dark());
}

#[tokio::test]
async fn storage_write_failure_is_best_effort() {
    let storage = Arc::new(MemoryPreferenceStorage::empty());
    let (_ambient_tx, ambient_rx) = watch::channel(false);

    let mut store =
        ThemeStore::initialize(Arc::clone(&storage) as Arc<dyn PreferenceStorage>, ambient_rx);
    storage.fail_writes();

    // The in-memory preference still applies for the session
    store.set_preference(ThemePreference::Dark).await;
    assert_eq!(store.preference(), ThemePreference::Dark);
    assert!(store.resolved_is_dark());
    assert_eq!(storage.stored(), None);
}
