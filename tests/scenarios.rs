use linked_probe::{BuildIdentityHasher, LinkedProbeMap, MapError};

type IdentityMap<V> = LinkedProbeMap<u64, V, BuildIdentityHasher>;

fn entries<V: Clone>(map: &IdentityMap<V>) -> Vec<(u64, V)> {
    map.iter().map(|(k, v)| (*k, v.clone())).collect()
}

#[test]
fn small_keys_in_one_cluster_are_found_in_order() {
    let mut map: IdentityMap<&str> = LinkedProbeMap::with_hasher(BuildIdentityHasher);
    assert_eq!(map.logical_capacity(), 2);

    map.insert(1, "a");
    map.insert(2, "b");
    map.insert(3, "c");

    assert_eq!(map.get(&1), Some(&"a"));
    assert_eq!(map.get(&2), Some(&"b"));
    assert_eq!(map.get(&3), Some(&"c"));
    assert_eq!(entries(&map), [(1, "a"), (2, "b"), (3, "c")]);
}

#[test]
fn six_keys_trigger_exactly_one_rebuild() {
    let mut map: IdentityMap<u64> = LinkedProbeMap::with_capacity_and_hasher(4, BuildIdentityHasher);
    assert_eq!(map.logical_capacity(), 8);

    for key in 0..6_u64 {
        map.insert(key, key * 100);
    }

    assert_eq!(map.logical_capacity(), 16);
    assert_eq!(map.slot_count(), 26);
    assert_eq!(map.len(), 6);
    for key in 0..6_u64 {
        assert_eq!(map.at(&key), Ok(&(key * 100)));
    }
}

#[test]
fn erasing_cluster_head_keeps_followers_findable() {
    let mut map: IdentityMap<&str> = LinkedProbeMap::with_capacity_and_hasher(4, BuildIdentityHasher);
    // 1, 9 and 17 share home slot 1 while the logical capacity is 8.
    map.insert(1, "A");
    map.insert(5, "X");
    map.insert(9, "B");
    map.insert(17, "C");

    map.remove(&1);

    assert!(map.find(&1) == map.cursor_end());
    assert_eq!(map.get(&9), Some(&"B"));
    assert_eq!(map.get(&17), Some(&"C"));
    assert_eq!(map.get(&5), Some(&"X"));
    assert_eq!(entries(&map), [(5, "X"), (9, "B"), (17, "C")]);
}

#[test]
fn erasing_reorders_cluster_members_after_unrelated_keys() {
    let mut map: IdentityMap<&str> = LinkedProbeMap::with_capacity_and_hasher(4, BuildIdentityHasher);
    map.insert(1, "A");
    map.insert(9, "B");
    map.insert(6, "Y");

    map.remove(&1);

    assert_eq!(entries(&map), [(6, "Y"), (9, "B")]);
}

#[test]
fn missing_key_fails_at_but_index_access_inserts() {
    let mut map: LinkedProbeMap<String, i32> = LinkedProbeMap::new();
    map.insert("present".to_string(), 3);

    assert_eq!(map.at("missing"), Err(MapError::KeyNotFound));
    assert_eq!(MapError::KeyNotFound.to_string(), "key is not found");

    let value = map.get_or_insert_default("missing".to_string());
    assert_eq!(*value, 0);
    *value = 42;

    assert_eq!(map.at("missing"), Ok(&42));
    assert_eq!(map.len(), 2);
}

#[test]
fn erase_then_find_returns_end() {
    let mut map: LinkedProbeMap<&str, i32> = LinkedProbeMap::from([("a", 1), ("b", 2), ("c", 3)]);

    assert_eq!(map.remove("b"), Some(2));
    assert!(map.find("b").is_end());
    assert!(map.find("b") == map.cursor_end());
    assert_eq!(map.find("a").value(), Some(&1));
    assert_eq!(map.find("c").value(), Some(&3));
}

#[test]
fn erasing_absent_key_is_a_no_op() {
    let mut map: IdentityMap<()> = LinkedProbeMap::with_capacity_and_hasher(4, BuildIdentityHasher);
    for key in [2_u64, 10, 3] {
        map.insert(key, ());
    }
    let before = entries(&map);

    assert_eq!(map.remove(&18), None);
    assert_eq!(map.remove(&7), None);

    assert_eq!(entries(&map), before);
    assert_eq!(map.len(), 3);
}

#[test]
fn clone_and_clear_are_independent() {
    let mut map: LinkedProbeMap<u32, String> =
        (0..20).map(|i| (i, format!("v{i}"))).collect();
    let copy = map.clone();

    map.clear();

    assert!(map.is_empty());
    assert_eq!(copy.len(), 20);
    assert_eq!(copy.keys().copied().collect::<Vec<_>>(), (0..20_u32).collect::<Vec<_>>());
    assert_eq!(copy.get(&7).map(String::as_str), Some("v7"));
}

#[test]
fn load_factor_stays_at_or_below_half() {
    let mut map = LinkedProbeMap::new();
    for key in 0..1_000_u32 {
        map.insert(key, ());
        assert!(map.len() * 2 <= map.logical_capacity());
        assert!(map.load_factor() <= 0.5);
    }
    let stats = map.probe_stats();
    assert_eq!(stats.len, 1_000);
    assert!(stats.longest_cluster >= 1);
}
