use std::error::Error;
use std::fs;
use std::sync::Arc;

use tempfile::tempdir;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use staticver::version::token_for_bytes;
use staticver::VersionCache;
use staticver_test_utils::builders::SettingsBuilder;
use staticver_test_utils::{init_tracing, wait_until};

type TestResult = Result<(), Box<dyn Error>>;

const LEN: usize = 12;
const SETTLE: Duration = Duration::from_secs(5);

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn modify_event_replaces_token() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    fs::write(dir.path().join("a.css"), "X")?;

    let mut cache = VersionCache::init(SettingsBuilder::new(dir.path()).token_len(LEN).build());
    assert!(cache.is_watching());

    let t1 = cache.get("a.css");
    assert_eq!(t1, token_for_bytes(b"X", LEN));

    fs::write(dir.path().join("a.css"), "Y")?;
    let t2 = token_for_bytes(b"Y", LEN);
    assert_ne!(t1, t2);

    let store = Arc::clone(cache.store());
    let updated = wait_until(SETTLE, || store.peek("a.css").as_deref() == Some(t2.as_str())).await;
    assert!(updated, "token for a.css never changed");
    assert_eq!(cache.get("a.css"), t2);

    cache.shutdown().await;
    assert!(!cache.is_watching());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn new_subdirectory_files_appear_in_cache() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    fs::write(dir.path().join("a.css"), "X")?;
    let mut cache = VersionCache::init(SettingsBuilder::new(dir.path()).token_len(LEN).build());

    fs::create_dir_all(dir.path().join("img/icons"))?;
    fs::write(dir.path().join("img/icons/logo.svg"), "<svg/>")?;
    let expected = token_for_bytes(b"<svg/>", LEN);

    let store = Arc::clone(cache.store());
    let seen = wait_until(SETTLE, || {
        store.peek("img/icons/logo.svg").as_deref() == Some(expected.as_str())
    })
    .await;
    assert!(seen, "nested file never reached the cache");

    cache.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn deleted_file_is_evicted() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    fs::write(dir.path().join("gone.css"), "bye")?;
    let mut cache = VersionCache::init(SettingsBuilder::new(dir.path()).build());
    assert!(cache.store().peek("gone.css").is_some());

    fs::remove_file(dir.path().join("gone.css"))?;

    let store = Arc::clone(cache.store());
    assert!(wait_until(SETTLE, || store.peek("gone.css").is_none()).await);
    assert_eq!(cache.get("gone.css"), "");

    cache.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn ignored_file_never_cached_after_creation() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let mut cache = VersionCache::init(SettingsBuilder::new(dir.path()).build());

    fs::write(dir.path().join(".DS_Store"), "finder")?;
    fs::write(dir.path().join("marker.css"), "m")?;

    // Events are handled in order, so once the marker is in, the ignored
    // file's event has been consumed too.
    let store = Arc::clone(cache.store());
    assert!(wait_until(SETTLE, || store.peek("marker.css").is_some()).await);
    assert_eq!(store.peek(".DS_Store"), None);

    cache.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn missing_root_starts_empty_and_unwatched() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let cache = VersionCache::init(SettingsBuilder::new(dir.path().join("missing")).build());

    assert!(!cache.is_watching());
    assert!(cache.store().is_empty());
    assert_eq!(cache.get("a.css"), "");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn external_cancellation_stops_watching() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let cancel = CancellationToken::new();
    let cache = VersionCache::init_with_cancellation(
        SettingsBuilder::new(dir.path()).build(),
        cancel.clone(),
    );
    assert!(cache.is_watching());

    cancel.cancel();
    assert!(wait_until(SETTLE, || !cache.is_watching()).await);

    // Lookups keep working without the watcher.
    fs::write(dir.path().join("late.css"), "late")?;
    assert!(!cache.get("late.css").is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn spawned_bridge_runs_until_shutdown() -> TestResult {
    use staticver::fs::RealFileSystem;
    use staticver::version::{IgnoreSet, VersionStore};
    use staticver::watch::spawn_bridge;

    init_tracing();

    let dir = tempdir()?;
    let root = dir.path().canonicalize()?;
    let store = Arc::new(VersionStore::new(
        root.clone(),
        Arc::new(RealFileSystem),
        IgnoreSet::default(),
        LEN,
    ));

    let handle = spawn_bridge(Arc::clone(&store), CancellationToken::new())?;
    assert!(!handle.is_finished());

    fs::write(root.join("fresh.css"), "fresh")?;
    let expected = token_for_bytes(b"fresh", LEN);
    assert!(
        wait_until(SETTLE, || store.peek("fresh.css").as_deref() == Some(expected.as_str())).await
    );

    handle.shutdown().await;
    Ok(())
}
