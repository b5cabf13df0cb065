use navmap::{BalancedTreeMap, NavigableMap, OrderedHashMap, SkipListMap, Structural};
use std::cmp::Ordering;

const NUMERIC_ORDER: [u32; 10] = [300, 600, 900, 1000, 700, 400, 100, 200, 500, 800];

const WORDS: [&str; 10] = [
    "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth", "tenth",
];

fn load_numeric<M: NavigableMap<u32, String>>(m: &mut M) {
    for k in NUMERIC_ORDER {
        assert_eq!(m.insert(k, format!("{k}blah")), None);
    }
}

fn load_words<M: NavigableMap<&'static str, usize>>(m: &mut M) {
    for (i, w) in WORDS.into_iter().enumerate() {
        m.insert(w, i);
    }
}

fn assert_empty<K, V, M: NavigableMap<K, V>>(m: &M, probe: &K) {
    assert_eq!(m.len(), 0);
    assert!(m.is_empty());
    assert!(m.first_key().is_none());
    assert!(m.last_key().is_none());
    assert!(m.ceiling_key(probe).is_none());
    assert!(m.floor_key(probe).is_none());
    assert!(m.higher_key(probe).is_none());
    assert!(m.lower_key(probe).is_none());
    assert!(m.get(probe).is_none());
}

// Snapshot of every navigation answer for probes around each stored key.
fn navigation_snapshot<M: NavigableMap<u32, String>>(m: &M) -> Vec<[Option<u32>; 4]> {
    (0..=1100)
        .step_by(50)
        .map(|k| {
            [
                m.ceiling_key(&k).copied(),
                m.floor_key(&k).copied(),
                m.higher_key(&k).copied(),
                m.lower_key(&k).copied(),
            ]
        })
        .collect()
}

type Descending = fn(&u32, &u32) -> Ordering;

fn descending(a: &u32, b: &u32) -> Ordering {
    b.cmp(a)
}

macro_rules! navigable_suite {
    ($name:ident, $map:ident, $descending:expr) => {
        mod $name {
            use super::*;

            #[test]
            fn empty_map_answers_none() {
                let m: $map<u32, String> = $map::new();
                assert_empty(&m, &500);
            }

            #[test]
            fn numeric_first_and_last() {
                let mut m: $map<u32, String> = $map::new();
                load_numeric(&mut m);
                assert_eq!(m.len(), 10);
                assert!(!m.is_empty());
                assert_eq!(m.first_key(), Some(&100));
                assert_eq!(m.last_key(), Some(&1000));
                assert_eq!(m.first_entry().map(|e| e.value().as_str()), Some("100blah"));
                assert_eq!(m.last_entry().map(|e| e.value().as_str()), Some("1000blah"));
            }

            #[test]
            fn numeric_ceiling() {
                let mut m: $map<u32, String> = $map::new();
                load_numeric(&mut m);
                assert_eq!(m.ceiling_key(&399), Some(&400));
                assert_eq!(m.ceiling_key(&400), Some(&400));
                assert_eq!(m.ceiling_key(&601), Some(&700));
                assert_eq!(m.ceiling_key(&0), Some(&100));
                assert_eq!(m.ceiling_key(&1001), None);
                assert_eq!(m.ceiling_entry(&601).map(|e| e.value().as_str()), Some("700blah"));
            }

            #[test]
            fn numeric_higher_skips_exact_match() {
                let mut m: $map<u32, String> = $map::new();
                load_numeric(&mut m);
                assert_eq!(m.higher_key(&100), Some(&200));
                assert_eq!(m.higher_key(&99), Some(&100));
                assert_eq!(m.higher_key(&950), Some(&1000));
                assert_eq!(m.higher_key(&1000), None);
            }

            #[test]
            fn numeric_floor_and_lower() {
                let mut m: $map<u32, String> = $map::new();
                load_numeric(&mut m);
                assert_eq!(m.floor_key(&399), Some(&300));
                assert_eq!(m.floor_key(&400), Some(&400));
                assert_eq!(m.floor_key(&5000), Some(&1000));
                assert_eq!(m.floor_key(&99), None);
                assert_eq!(m.lower_key(&400), Some(&300));
                assert_eq!(m.lower_key(&401), Some(&400));
                assert_eq!(m.lower_key(&100), None);
                assert_eq!(m.lower_entry(&1000).map(|e| e.value().as_str()), Some("900blah"));
            }

            #[test]
            fn overwrite_keeps_len() {
                let mut m: $map<u32, String> = $map::new();
                load_numeric(&mut m);
                assert_eq!(m.insert(500, "replaced".into()).as_deref(), Some("500blah"));
                assert_eq!(m.len(), 10);
                assert_eq!(m.get(&500).map(String::as_str), Some("replaced"));
                assert!(m.contains_key(&500));
                assert!(!m.contains_key(&550));
            }

            #[test]
            fn string_keys_order_lexicographically() {
                let mut m: $map<&'static str, usize> = $map::new();
                load_words(&mut m);
                assert_eq!(m.first_key(), Some(&"eighth"));
                assert_eq!(m.last_key(), Some(&"third"));
                assert_eq!(m.higher_key(&"eighth"), Some(&"fifth"));
                assert_eq!(m.higher_key(&"third"), None);
                assert_eq!(m.ceiling_key(&"secone"), Some(&"seventh"));
                assert_eq!(m.ceiling_key(&"thire"), None);
                assert_eq!(m.floor_key(&"secone"), Some(&"second"));
                assert_eq!(m.lower_key(&"eighth"), None);
            }

            #[test]
            fn clear_restores_empty_behavior() {
                let mut m: $map<u32, String> = $map::new();
                load_numeric(&mut m);
                m.clear();
                assert_empty(&m, &500);
                load_numeric(&mut m);
                assert_eq!(m.len(), 10);
                assert_eq!(m.first_key(), Some(&100));
            }

            /// Invariant: inserting then removing a new key restores the size
            /// and every navigation answer.
            #[test]
            fn insert_remove_round_trip() {
                let mut m: $map<u32, String> = $map::new();
                load_numeric(&mut m);
                let before = navigation_snapshot(&m);
                for k in [50, 450, 1050] {
                    assert_eq!(m.insert(k, "tmp".into()), None);
                    assert_eq!(m.len(), 11);
                    assert_eq!(m.remove(&k).as_deref(), Some("tmp"));
                    assert_eq!(m.len(), 10);
                    assert_eq!(navigation_snapshot(&m), before);
                }
                assert_eq!(m.remove(&450), None);
            }

            #[test]
            fn remove_every_key_in_order() {
                let mut m: $map<u32, String> = $map::new();
                load_numeric(&mut m);
                for k in NUMERIC_ORDER {
                    assert_eq!(m.remove(&k), Some(format!("{k}blah")));
                    assert!(!m.contains_key(&k));
                }
                assert_empty(&m, &100);
            }

            /// Invariant: navigation follows the injected comparator, not the
            /// key type's natural order.
            #[test]
            fn descending_comparator_mirrors_navigation() {
                let mut m = $descending;
                load_numeric(&mut m);
                assert_eq!(m.len(), 10);
                assert_eq!(m.first_key(), Some(&1000));
                assert_eq!(m.last_key(), Some(&100));
                assert_eq!(m.ceiling_key(&399), Some(&300));
                assert_eq!(m.ceiling_key(&50), None);
                assert_eq!(m.floor_key(&601), Some(&700));
                assert_eq!(m.higher_key(&1000), Some(&900));
                assert_eq!(m.higher_key(&100), None);
                assert_eq!(m.lower_key(&100), Some(&200));
                assert_eq!(m.remove(&1000).as_deref(), Some("1000blah"));
                assert_eq!(m.first_key(), Some(&900));
            }

            #[test]
            fn optional_keys_place_none_first() {
                let mut m: $map<Option<u32>, u8> = $map::new();
                m.insert(Some(7), 1);
                m.insert(None, 0);
                m.insert(Some(3), 2);
                assert_eq!(m.first_key(), Some(&None));
                assert_eq!(m.higher_key(&None), Some(&Some(3)));
                assert_eq!(m.lower_key(&Some(3)), Some(&None));
                assert_eq!(m.get(&None), Some(&0));
            }
        }
    };
}

navigable_suite!(
    balanced_tree,
    BalancedTreeMap,
    BalancedTreeMap::<u32, String, Descending>::with_comparator(descending)
);
navigable_suite!(
    skip_list,
    SkipListMap,
    SkipListMap::<u32, String, Descending>::with_comparator(descending)
);
navigable_suite!(
    ordered_hash,
    OrderedHashMap,
    OrderedHashMap::<u32, String, Descending, Structural>::with_parts(descending, Structural::new())
);
