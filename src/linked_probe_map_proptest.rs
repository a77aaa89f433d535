#![cfg(test)]

// Model-based property tests. They live inside the crate so they can look at
// the slot table and predict which entries a removal displaces.

use crate::{LinkedProbeMap, slot::Probe, utils::BuildIdentityHasher};
use proptest::prelude::*;
use std::collections::HashMap;

type IdentityMap = LinkedProbeMap<u64, i32, BuildIdentityHasher>;

#[derive(Clone, Debug)]
enum Op {
    Insert(u64, i32),
    Assign(u64, i32),
    Remove(u64),
    Clear,
}

// A small key space under the identity hasher keeps probe clusters long.
fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        8 => (0u64..48, any::<i32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        3 => (0u64..48, any::<i32>()).prop_map(|(k, v)| Op::Assign(k, v)),
        6 => (0u64..48).prop_map(Op::Remove),
        1 => Just(Op::Clear),
    ]
}

#[derive(Default)]
struct Model {
    values: HashMap<u64, i32>,
    order: Vec<u64>,
}

// Keys in the occupied run right after `key`'s slot, in slot order.
fn cluster_after(map: &IdentityMap, key: u64) -> Vec<u64> {
    let Probe::Occupied(hole) = map.locate(&key) else {
        return Vec::new();
    };
    let mut keys = Vec::new();
    let mut index = (hole + 1) % map.slot_count();
    while index != hole {
        let Some(slot) = map.slot(index) else { break };
        keys.push(slot.key);
        index = (index + 1) % map.slot_count();
    }
    keys
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_matches_model(ops in proptest::collection::vec(arb_op(), 1..200)) {
        let mut map: IdentityMap = LinkedProbeMap::with_hasher(BuildIdentityHasher);
        let mut model = Model::default();

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    let inserted = map.insert(k, v);
                    prop_assert_eq!(inserted, !model.values.contains_key(&k));
                    if inserted {
                        model.values.insert(k, v);
                        model.order.push(k);
                    }
                }
                Op::Assign(k, v) => {
                    *map.get_or_insert_default(k) = v;
                    if model.values.insert(k, v).is_none() {
                        model.order.push(k);
                    }
                }
                Op::Remove(k) => {
                    let displaced = cluster_after(&map, k);
                    let removed = map.remove(&k);
                    prop_assert_eq!(removed, model.values.remove(&k));
                    if removed.is_some() {
                        model.order.retain(|key| *key != k && !displaced.contains(key));
                        model.order.extend(displaced);
                    } else {
                        prop_assert!(displaced.is_empty());
                    }
                }
                Op::Clear => {
                    map.clear();
                    model.values.clear();
                    model.order.clear();
                }
            }

            map.check_invariants();
            prop_assert_eq!(map.len(), model.values.len());
            let order: Vec<u64> = map.keys().copied().collect();
            prop_assert_eq!(&order, &model.order);
            for (k, v) in &model.values {
                prop_assert_eq!(map.get(k), Some(v));
                prop_assert!(!map.find(k).is_end());
            }
        }

        let copy = map.clone();
        copy.check_invariants();
        prop_assert!(copy == map);
        prop_assert_eq!(copy.keys().collect::<Vec<_>>(), map.keys().collect::<Vec<_>>());
    }

    #[test]
    fn prop_insert_only_keeps_first_insertion_order(
        pairs in proptest::collection::vec(("[a-z]{1,4}", any::<u16>()), 0..150)
    ) {
        let mut map = LinkedProbeMap::new();
        let mut expected: Vec<(String, u16)> = Vec::new();
        for (k, v) in pairs {
            if !expected.iter().any(|(key, _)| *key == k) {
                expected.push((k.clone(), v));
            }
            map.insert(k, v);
        }

        map.check_invariants();
        let seen: Vec<(String, u16)> = map.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(seen, expected);
        prop_assert!(map.logical_capacity() == 2 || map.len() * 4 > map.logical_capacity());
    }

    #[test]
    fn prop_unrelated_removals_keep_keys_findable(
        keys in proptest::collection::hash_set(0u64..10_000, 1..120),
        victims in proptest::collection::vec(any::<prop::sample::Index>(), 0..40)
    ) {
        let keys: Vec<u64> = keys.into_iter().collect();
        let mut map: LinkedProbeMap<u64, u64> = keys.iter().map(|k| (*k, k * 3)).collect();

        let mut removed = Vec::new();
        for victim in victims {
            let key = *victim.get(&keys);
            map.remove(&key);
            removed.push(key);
        }

        map.check_invariants();
        for key in &keys {
            if removed.contains(key) {
                prop_assert!(map.find(key) == map.cursor_end());
            } else {
                prop_assert_eq!(map.at(key), Ok(&(key * 3)));
            }
        }
    }
}
