use navgate_cache::family::MemFamilyCache;
use navgate_core::cache::port::FamilyCache;
use std::collections::BTreeSet;
use std::sync::Arc;

fn families(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn test_new_cache_is_empty() {
    let cache = MemFamilyCache::new();
    assert!(cache.snapshot().is_empty());
}

#[test]
fn test_replace_swaps_whole_snapshot() {
    let cache = MemFamilyCache::new();

    let old = cache.replace(families(&["Beta MF", "Alpha MF"]));
    assert!(old.is_empty());

    // 读取者持有的旧快照不受后续替换影响
    let held = cache.snapshot();
    let previous = cache.replace(families(&["Gamma MF"]));
    assert!(Arc::ptr_eq(&held, &previous));
    assert_eq!(
        held.iter().cloned().collect::<Vec<_>>(),
        vec!["Alpha MF", "Beta MF"]
    );
    assert_eq!(
        cache.snapshot().iter().cloned().collect::<Vec<_>>(),
        vec!["Gamma MF"]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_readers_see_consistent_snapshot() {
    let cache = Arc::new(MemFamilyCache::new());
    cache.replace(families(&["Alpha MF", "Beta MF"]));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move { cache.snapshot().len() }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), 2);
    }
}
