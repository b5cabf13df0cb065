use navmap::{BalancedTreeMap, NavigableMap, OrderedHashMap, SkipListMap};
use proptest::prelude::*;

type Answers = Vec<Option<(String, u32)>>;

// Every shared-contract query, flattened into one comparable record.
fn answers<M: NavigableMap<String, u32>>(m: &M, probes: &[String]) -> (usize, Answers) {
    let mut out = vec![
        m.first_entry().map(|e| e.cloned()),
        m.last_entry().map(|e| e.cloned()),
    ];
    for p in probes {
        out.push(m.get(p).map(|v| (p.clone(), *v)));
        out.push(m.ceiling_entry(p).map(|e| e.cloned()));
        out.push(m.floor_entry(p).map(|e| e.cloned()));
        out.push(m.higher_entry(p).map(|e| e.cloned()));
        out.push(m.lower_entry(p).map(|e| e.cloned()));
    }
    (m.len(), out)
}

fn apply<M: NavigableMap<String, u32>>(m: &mut M, ops: &[(bool, String, u32)]) -> Vec<Option<u32>> {
    ops.iter()
        .map(|(put, k, v)| if *put { m.insert(k.clone(), *v) } else { m.remove(k) })
        .collect()
}

// Given the same puts and removes, the three navigable maps agree on every
// return value and every boundary query.
proptest! {
    #[test]
    fn prop_navigable_maps_agree(
        ops in proptest::collection::vec((prop::bool::weighted(0.7), "[a-e]{1,3}", any::<u32>()), 0..150),
        probes in proptest::collection::vec("[a-f]{0,3}", 1..20),
    ) {
        let mut tree = BalancedTreeMap::new();
        let mut skip = SkipListMap::new();
        let mut hashed = OrderedHashMap::new();

        let from_tree = apply(&mut tree, &ops);
        prop_assert_eq!(&from_tree, &apply(&mut skip, &ops));
        prop_assert_eq!(&from_tree, &apply(&mut hashed, &ops));

        let expected = answers(&tree, &probes);
        prop_assert_eq!(&expected, &answers(&skip, &probes));
        prop_assert_eq!(&expected, &answers(&hashed, &probes));
    }

    #[test]
    fn prop_clear_matches_fresh_map(keys in proptest::collection::vec("[a-z]{1,4}", 1..60)) {
        let probes: Vec<String> = keys.iter().take(5).cloned().chain(["".to_string(), "zzzzz".to_string()]).collect();
        let fresh = answers(&BalancedTreeMap::<String, u32>::new(), &probes);

        let mut skip = SkipListMap::new();
        let mut hashed = OrderedHashMap::new();
        for (i, k) in keys.iter().enumerate() {
            skip.insert(k.clone(), i as u32);
            hashed.insert(k.clone(), i as u32);
        }
        skip.clear();
        hashed.clear();
        prop_assert_eq!(&fresh, &answers(&skip, &probes));
        prop_assert_eq!(&fresh, &answers(&hashed, &probes));
    }
}
