use staticver::version::{token_for_bytes, IgnoreSet, DEFAULT_TOKEN_LEN};
use staticver_test_utils::builders::MockTree;

fn sample_tree() -> MockTree {
    let tree = MockTree::new();
    tree.file("a.css", "X")
        .file("js/app.js", "app")
        .file("js/lib/util.js", "util")
        .file("jsx.css", "jsx")
        .file(".DS_Store", "finder")
        .file("js/.DS_Store", "finder");
    tree
}

#[test]
fn prewarm_walks_tree_and_skips_ignored_names() {
    let tree = sample_tree();
    let store = tree.store();

    let stored = store.prewarm_all();
    assert_eq!(stored, 4);

    let keys: Vec<String> = store.snapshot().into_keys().collect();
    assert_eq!(keys, vec!["a.css", "js/app.js", "js/lib/util.js", "jsx.css"]);
    assert_eq!(
        store.peek("a.css"),
        Some(token_for_bytes(b"X", DEFAULT_TOKEN_LEN))
    );
    assert_eq!(tree.reads(".DS_Store"), 0);
}

#[test]
fn prewarm_twice_yields_identical_mapping() {
    let tree = sample_tree();
    let store = tree.store();

    store.prewarm_all();
    let first = store.snapshot();
    store.prewarm_all();
    let second = store.snapshot();

    assert_eq!(first, second);
}

#[test]
fn get_fills_lazily_and_reads_once() {
    let tree = sample_tree();
    let store = tree.store();

    let t1 = store.get("a.css");
    assert_eq!(t1, token_for_bytes(b"X", DEFAULT_TOKEN_LEN));
    assert_eq!(tree.reads("a.css"), 1);

    let t2 = store.get("a.css");
    let t3 = store.get("/a.css");
    assert_eq!(t1, t2);
    assert_eq!(t1, t3);
    assert_eq!(tree.reads("a.css"), 1);
}

#[test]
fn get_normalizes_separators() {
    let tree = sample_tree();
    let store = tree.store();

    let forward = store.get("js/app.js");
    assert!(!forward.is_empty());
    assert_eq!(store.get("js\\app.js"), forward);
    assert_eq!(store.get("./js//app.js"), forward);
    assert_eq!(tree.reads("js/app.js"), 1);
}

#[test]
fn get_rejects_keys_escaping_the_root() {
    let tree = sample_tree();
    let store = tree.store();

    assert_eq!(store.get("../etc/passwd"), "");
    assert_eq!(store.get("js/../../secret"), "");
    assert_eq!(store.get(""), "");
    assert_eq!(store.get("/"), "");
    assert_eq!(tree.fs.total_reads(), 0);
    assert!(store.is_empty());
}

#[test]
fn failed_lookup_is_not_cached_and_retries() {
    let tree = sample_tree();
    let store = tree.store();

    assert_eq!(store.get("late.css"), "");
    assert_eq!(store.peek("late.css"), None);
    assert_eq!(tree.reads("late.css"), 1);

    tree.file("late.css", "now here");
    assert_eq!(
        store.get("late.css"),
        token_for_bytes(b"now here", DEFAULT_TOKEN_LEN)
    );
    assert_eq!(tree.reads("late.css"), 2);
}

#[test]
fn directories_have_no_token() {
    let tree = sample_tree();
    let store = tree.store();

    assert_eq!(store.get("js"), "");
    assert_eq!(store.peek("js"), None);
}

#[test]
fn ignored_names_never_enter_the_cache() {
    let tree = sample_tree();
    let store = tree.store();

    assert_eq!(store.get(".DS_Store"), "");
    assert_eq!(store.get("js/.DS_Store"), "");
    store.put(".DS_Store", "abcd");
    assert_eq!(store.refresh("js/.DS_Store"), None);

    assert_eq!(store.peek(".DS_Store"), None);
    assert_eq!(store.peek("js/.DS_Store"), None);
    assert_eq!(tree.reads(".DS_Store"), 0);
}

#[test]
fn ignored_directories_are_not_walked() {
    let tree = sample_tree();
    tree.file("node_modules/pkg/index.js", "module.exports = 1");
    let mut ignores = IgnoreSet::default();
    ignores.insert("node_modules");
    let store = tree.store_with(ignores, DEFAULT_TOKEN_LEN);

    store.prewarm_all();

    assert_eq!(store.peek("node_modules/pkg/index.js"), None);
    assert_eq!(tree.reads("node_modules/pkg/index.js"), 0);
}

#[test]
fn put_overwrites_and_refuses_empty_tokens() {
    let tree = sample_tree();
    let store = tree.store();

    store.put("a.css", "1111");
    store.put("a.css", "2222");
    assert_eq!(store.peek("a.css").as_deref(), Some("2222"));

    store.put("b.css", "");
    assert_eq!(store.peek("b.css"), None);
    assert_eq!(store.get("a.css"), "2222");
    assert_eq!(tree.reads("a.css"), 0);
}

#[test]
fn delete_removes_entry_and_is_noop_when_absent() {
    let tree = sample_tree();
    let store = tree.store();
    store.prewarm_all();

    store.delete("a.css");
    store.delete("a.css");
    store.delete("never-there.css");

    assert_eq!(store.peek("a.css"), None);
    assert_eq!(store.len(), 3);
}

#[test]
fn delete_under_respects_path_boundaries() {
    let tree = sample_tree();
    let store = tree.store();
    store.prewarm_all();

    let removed = store.delete_under("js");

    assert_eq!(removed, 2);
    assert_eq!(store.peek("js/app.js"), None);
    assert_eq!(store.peek("js/lib/util.js"), None);
    assert!(store.peek("jsx.css").is_some());
    assert!(store.peek("a.css").is_some());
}

#[test]
fn failed_refresh_keeps_previous_token() {
    let tree = sample_tree();
    let store = tree.store();
    let before = store.get("a.css");

    tree.remove("a.css");
    assert_eq!(store.refresh("a.css"), None);

    assert_eq!(store.peek("a.css"), Some(before));
}

#[test]
fn refresh_picks_up_new_content() {
    let tree = sample_tree();
    let store = tree.store();
    store.get("a.css");

    tree.file("a.css", "Y");
    let token = store.refresh("a.css");

    assert_eq!(token, Some(token_for_bytes(b"Y", DEFAULT_TOKEN_LEN)));
    assert_eq!(store.peek("a.css"), token);
}

#[test]
fn rebuild_drops_entries_for_vanished_files() {
    let tree = sample_tree();
    let store = tree.store();
    store.prewarm_all();

    tree.remove("js");
    tree.file("new.css", "new");
    let stored = store.rebuild();

    assert_eq!(stored, 3);
    let keys: Vec<String> = store.snapshot().into_keys().collect();
    assert_eq!(keys, vec!["a.css", "jsx.css", "new.css"]);
}

#[test]
fn prewarm_on_missing_root_stores_nothing() {
    let tree = MockTree::new();
    tree.fs.remove(tree.root());
    let store = tree.store();

    assert_eq!(store.prewarm_all(), 0);
    assert!(store.is_empty());
}

#[test]
fn token_length_follows_store_setting() {
    let tree = sample_tree();
    let store = tree.store_with(IgnoreSet::default(), 16);

    assert_eq!(store.get("a.css"), token_for_bytes(b"X", 16));
    assert_eq!(store.token_len(), 16);
}

#[test]
fn refresh_reports_current_token_for_new_and_existing_entries() {
    let tree = sample_tree();
    let store = tree.store();

    let created = store.refresh("a.css");
    let unchanged = store.refresh("a.css");
    tree.file("a.css", "Z");
    let updated = store.refresh("a.css");

    assert_eq!(created, Some(token_for_bytes(b"X", DEFAULT_TOKEN_LEN)));
    assert_eq!(unchanged, created);
    assert_eq!(updated, Some(token_for_bytes(b"Z", DEFAULT_TOKEN_LEN)));
    assert_eq!(store.peek("a.css"), updated);
}
