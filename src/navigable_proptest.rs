#![cfg(test)]

use crate::capability::{FnEquivalence, KeyEquivalence, NaturalOrder};
use crate::config::{HashTableConfig, SkipListConfig};
use crate::hash_table::HashTable;
use crate::insertion_order_map::InsertionOrderMap;
use crate::navigable::NavigableMap;
use crate::ordered_hash_map::OrderedHashMap;
use crate::skip_list::SkipListMap;
use crate::tree_map::BalancedTreeMap;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound::{Excluded, Included, Unbounded};

type Key = i16;

#[derive(Clone, Debug)]
enum Op {
    Insert(Key, i32),
    Remove(Key),
    Get(Key),
    Ceiling(Key),
    Floor(Key),
    Higher(Key),
    Lower(Key),
    Ends,
    Clear,
}

// Narrow key range so inserts overwrite and removes hit often.
fn arb_key() -> impl Strategy<Value = Key> {
    -40i16..40
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (arb_key(), any::<i32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        3 => arb_key().prop_map(Op::Remove),
        2 => arb_key().prop_map(Op::Get),
        1 => arb_key().prop_map(Op::Ceiling),
        1 => arb_key().prop_map(Op::Floor),
        1 => arb_key().prop_map(Op::Higher),
        1 => arb_key().prop_map(Op::Lower),
        1 => Just(Op::Ends),
        1 => Just(Op::Clear),
    ]
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(arb_op(), 1..200)
}

fn pair(e: Option<(&Key, &i32)>) -> Option<(Key, i32)> {
    e.map(|(k, v)| (*k, *v))
}

// Drives `sut` and a BTreeMap through the same ops, comparing every answer
// and running `check` after each step.
fn run_navigable<M>(
    sut: &mut M,
    ops: Vec<Op>,
    check: impl Fn(&M),
) -> Result<(), TestCaseError>
where
    M: NavigableMap<Key, i32>,
{
    let mut model: BTreeMap<Key, i32> = BTreeMap::new();
    for op in ops {
        match op {
            Op::Insert(k, v) => {
                prop_assert_eq!(sut.insert(k, v), model.insert(k, v));
            }
            Op::Remove(k) => {
                prop_assert_eq!(sut.remove(&k), model.remove(&k));
            }
            Op::Get(k) => {
                prop_assert_eq!(sut.get(&k), model.get(&k));
                prop_assert_eq!(sut.contains_key(&k), model.contains_key(&k));
            }
            Op::Ceiling(k) => {
                let s = sut.ceiling_entry(&k).map(|e| e.cloned());
                prop_assert_eq!(s, pair(model.range((Included(k), Unbounded)).next()));
            }
            Op::Floor(k) => {
                let s = sut.floor_entry(&k).map(|e| e.cloned());
                prop_assert_eq!(s, pair(model.range((Unbounded, Included(k))).next_back()));
            }
            Op::Higher(k) => {
                let s = sut.higher_entry(&k).map(|e| e.cloned());
                prop_assert_eq!(s, pair(model.range((Excluded(k), Unbounded)).next()));
            }
            Op::Lower(k) => {
                let s = sut.lower_entry(&k).map(|e| e.cloned());
                prop_assert_eq!(s, pair(model.range((Unbounded, Excluded(k))).next_back()));
            }
            Op::Ends => {
                prop_assert_eq!(sut.first_key().copied(), model.keys().next().copied());
                prop_assert_eq!(sut.last_key().copied(), model.keys().next_back().copied());
            }
            Op::Clear => {
                sut.clear();
                model.clear();
            }
        }
        check(sut);
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
    }
    Ok(())
}

// Every key lands in one bucket.
fn colliding() -> impl KeyEquivalence<Key> {
    FnEquivalence::new(|_: &Key| 0, |a: &Key, b: &Key| a == b)
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    // Property: the AVL tree answers every query like BTreeMap and stays
    // balanced after each op.
    #[test]
    fn prop_tree_matches_btreemap(ops in arb_ops()) {
        let mut sut: BalancedTreeMap<Key, i32> = BalancedTreeMap::new();
        run_navigable(&mut sut, ops, |m| m.assert_invariants())?;
    }

    // Property: the skip list agrees with BTreeMap for any level sequence.
    #[test]
    fn prop_skip_list_matches_btreemap(ops in arb_ops(), seed in any::<u64>()) {
        let config = SkipListConfig::for_expected_len(64).with_seed(seed);
        let mut sut: SkipListMap<Key, i32> = SkipListMap::with_config(NaturalOrder, config)
            .expect("valid config");
        run_navigable(&mut sut, ops, |m| m.assert_invariants())?;
    }

    // Property: the ordered hash map agrees with BTreeMap even when every
    // key collides in the table.
    #[test]
    fn prop_ordered_hash_map_matches_btreemap(ops in arb_ops()) {
        let config = HashTableConfig { initial_capacity: 1, ..HashTableConfig::default() };
        let mut sut: OrderedHashMap<Key, i32, _, _> =
            OrderedHashMap::with_config(NaturalOrder, colliding(), config)
            .expect("valid config");
        run_navigable(&mut sut, ops, |m| m.assert_invariants())?;
    }

    // Property: the chained table agrees with HashMap on point operations
    // and iterates exactly the live entries.
    #[test]
    fn prop_hash_table_matches_hashmap(ops in arb_ops(), collide in any::<bool>()) {
        let mut model: HashMap<Key, i32> = HashMap::new();
        let mut plain: HashTable<Key, i32> = HashTable::new();
        let mut clashing = HashTable::with_equivalence(colliding());
        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    let expected = model.insert(k, v);
                    if collide {
                        prop_assert_eq!(clashing.insert(k, v), expected);
                    } else {
                        prop_assert_eq!(plain.insert(k, v), expected);
                    }
                }
                Op::Remove(k) => {
                    let expected = model.remove(&k);
                    if collide {
                        prop_assert_eq!(clashing.remove(&k), expected);
                    } else {
                        prop_assert_eq!(plain.remove(&k), expected);
                    }
                }
                Op::Clear => {
                    model.clear();
                    plain.clear();
                    clashing.clear();
                }
                Op::Get(k) | Op::Ceiling(k) | Op::Floor(k) | Op::Higher(k) | Op::Lower(k) => {
                    let s = if collide { clashing.get(&k) } else { plain.get(&k) };
                    prop_assert_eq!(s, model.get(&k));
                }
                Op::Ends => {
                    let mut seen: Vec<_> = if collide {
                        clashing.iter().map(|e| e.cloned()).collect()
                    } else {
                        plain.iter().map(|e| e.cloned()).collect()
                    };
                    seen.sort_unstable();
                    let mut expected: Vec<_> = model.iter().map(|(k, v)| (*k, *v)).collect();
                    expected.sort_unstable();
                    prop_assert_eq!(seen, expected);
                }
            }
            plain.assert_invariants();
            clashing.assert_invariants();
            let len = if collide { clashing.len() } else { plain.len() };
            prop_assert_eq!(len, model.len());
        }
    }

    // Property: the insertion-order map iterates in first-insertion order;
    // overwriting keeps a key's position and removal forgets it.
    #[test]
    fn prop_insertion_order_matches_model(ops in arb_ops()) {
        let mut sut: InsertionOrderMap<Key, i32> = InsertionOrderMap::new();
        let mut order: Vec<Key> = Vec::new();
        let mut model: HashMap<Key, i32> = HashMap::new();
        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    let prev = model.insert(k, v);
                    if prev.is_none() {
                        order.push(k);
                    }
                    prop_assert_eq!(sut.insert(k, v), prev);
                }
                Op::Remove(k) => {
                    let prev = model.remove(&k);
                    order.retain(|o| *o != k);
                    prop_assert_eq!(sut.remove(&k), prev);
                }
                Op::Clear => {
                    sut.clear();
                    model.clear();
                    order.clear();
                }
                Op::Ends => {
                    prop_assert_eq!(sut.eldest().map(|e| *e.key()), order.first().copied());
                    prop_assert_eq!(sut.newest().map(|e| *e.key()), order.last().copied());
                }
                Op::Get(k) | Op::Ceiling(k) | Op::Floor(k) | Op::Higher(k) | Op::Lower(k) => {
                    prop_assert_eq!(sut.get(&k), model.get(&k));
                }
            }
            sut.assert_invariants();
            let keys: Vec<Key> = sut.keys().copied().collect();
            prop_assert_eq!(&keys, &order);
        }
    }
}
