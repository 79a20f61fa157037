// HashTable / HashMap property tests.
//
// Property 1: the table behaves like std's HashMap under random operations.
//  - Model: std::collections::HashMap<u16, u32>.
//  - Hash: a deliberately weak hash (key % 7) so that long collision runs,
//    wrap-around and tombstones in the middle of probe sequences are common.
//  - Operations: put, remove, get, entry-add, clear, reserve.
//  - Invariant after each step: len() matches, the touched key agrees with
//    the model, the load stays below 3/4 and capacity is a power of two.
//  - Final: every key in the key space agrees, iteration yields exactly the
//    model's pairs.
//
// Property 2: growth is transparent with a good hash.
//  - Insert a random set of distinct keys, remove a random subset, and
//    check that every survivor is found and every removed key is not.
//
// Property 3: the HashMap wrapper agrees with std's HashMap.
use std::collections::HashMap as StdHashMap;

use chest::HashMap;
use chest::HashTable;
use chest::hash::FnvBuildHasher;
use chest::hash::fmix64;
use proptest::prelude::*;

fn weak_hash(k: &u16) -> u64 {
    *k as u64 % 7
}

fn u16_eq(a: &u16, b: &u16) -> bool {
    a == b
}

type WeakTable = HashTable<u16, u32, fn(&u16) -> u64, fn(&u16, &u16) -> bool>;

fn weak_table() -> WeakTable {
    HashTable::new(weak_hash as fn(&u16) -> u64, u16_eq as fn(&u16, &u16) -> bool)
}

fn check_shape(table: &WeakTable) -> Result<(), TestCaseError> {
    let capacity = table.capacity();
    prop_assert!(capacity == 0 || capacity.is_power_of_two());
    prop_assert!(capacity == 0 || capacity >= chest::hash_table::MIN_CAPACITY);
    prop_assert!(table.len() * 4 < capacity.max(1) * 3 || table.is_empty());
    Ok(())
}

proptest! {
    #[test]
    fn prop_table_matches_model(
        key_space in 1u16..=96,
        ops in proptest::collection::vec((0u8..=9u8, any::<u16>(), any::<u32>()), 1..400)
    ) {
        let mut table = weak_table();
        let mut model: StdHashMap<u16, u32> = StdHashMap::new();

        for (op, raw_k, value) in ops {
            let k = raw_k % key_space;
            match op {
                // Put, the common case.
                0..=3 => {
                    let previous = table.put(k, value).unwrap();
                    prop_assert_eq!(previous, model.insert(k, value));
                }
                // Remove.
                4 | 5 => {
                    prop_assert_eq!(table.remove(&k), model.remove(&k));
                }
                // Lookup.
                6 => {
                    prop_assert_eq!(table.get(&k), model.get(&k));
                    prop_assert_eq!(table.contains_key(&k), model.contains_key(&k));
                }
                // Read-modify-write through the entry API.
                7 => {
                    let slot = table.entry(k).unwrap().or_insert(0);
                    *slot = slot.wrapping_add(value);
                    let expected = model.entry(k).or_insert(0);
                    *expected = expected.wrapping_add(value);
                }
                // Reserve a little headroom.
                8 => {
                    let before = table.capacity();
                    table.reserve((value % 16) as usize).unwrap();
                    prop_assert!(table.capacity() >= before);
                }
                // Clear, rarely.
                9 => {
                    if value % 8 == 0 {
                        let capacity = table.capacity();
                        table.clear();
                        model.clear();
                        prop_assert_eq!(table.capacity(), capacity);
                    }
                }
                _ => unreachable!(),
            }

            prop_assert_eq!(table.len(), model.len());
            prop_assert_eq!(table.get(&k), model.get(&k));
            check_shape(&table)?;
        }

        for k in 0..key_space {
            prop_assert_eq!(table.get(&k), model.get(&k));
        }

        let mut seen: Vec<(u16, u32)> = table.iter().map(|(k, v)| (*k, *v)).collect();
        let mut expected: Vec<(u16, u32)> = model.into_iter().collect();
        seen.sort_unstable();
        expected.sort_unstable();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn prop_growth_preserves_survivors(
        keys in proptest::collection::hash_set(any::<u64>(), 0..600),
        remove_mask in any::<u64>(),
    ) {
        let mut table = HashTable::new(|k: &u64| fmix64(*k), |a: &u64, b: &u64| a == b);
        for &k in &keys {
            prop_assert_eq!(table.put(k, !k).unwrap(), None);
        }
        prop_assert_eq!(table.len(), keys.len());

        let mut removed = Vec::new();
        for (i, &k) in keys.iter().enumerate() {
            if remove_mask >> (i % 64) & 1 == 1 {
                prop_assert_eq!(table.remove(&k), Some(!k));
                removed.push(k);
            }
        }

        for &k in &keys {
            let expected = if removed.contains(&k) { None } else { Some(!k) };
            prop_assert_eq!(table.get(&k).copied(), expected);
        }
        prop_assert_eq!(table.len(), keys.len() - removed.len());
        prop_assert!(table.len() * 4 < table.capacity() * 3);
    }

    #[test]
    fn prop_hash_map_matches_model(
        ops in proptest::collection::vec((any::<bool>(), "[a-e]{1,3}", any::<i32>()), 1..200)
    ) {
        let mut map: HashMap<String, i32, FnvBuildHasher> = HashMap::default();
        let mut model: StdHashMap<String, i32> = StdHashMap::new();

        for (insert, key, value) in ops {
            if insert {
                prop_assert_eq!(map.insert(key.clone(), value), model.insert(key.clone(), value));
            } else {
                prop_assert_eq!(map.remove(&key), model.remove(&key));
            }
            prop_assert_eq!(map.len(), model.len());
            prop_assert_eq!(map.get(&key), model.get(&key));
        }

        for (key, value) in &model {
            prop_assert_eq!(&map[key], value);
        }
    }
}
