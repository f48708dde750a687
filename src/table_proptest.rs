#![cfg(test)]

// Property tests for Table kept inside the crate so they can reach the
// hasher plumbing without widening the public API.

use crate::table::Table;
use core::hash::{BuildHasher, Hasher};
use hashbrown::HashMap;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::BTreeMap;

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum Op {
    Set(usize, i32),
    Insert(usize, i32),
    Get(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,6}", 1..=48).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            3 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Set(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
            2 => idx.clone().prop_map(Op::Get),
            1 => "[a-z]{0,6}".prop_map(Op::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
            1 => Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

// State-machine equivalence against hashbrown::HashMap.
// Invariants exercised after every op:
// - set/insert/get/contains_key agree with the model, including the value
//   displaced by insert;
// - len matches the model; capacity is a power of two above len;
// - a full iteration yields exactly the model's entries.
fn run_scenario<S: BuildHasher>(
    mut sut: Table<i32, S>,
    pool: &[String],
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();

    for op in ops {
        match op {
            Op::Set(i, v) => {
                let k = &pool[i];
                let stored = sut.set(k, v).expect("set within memory");
                prop_assert_eq!(stored, k.as_str());
                model.insert(k.clone(), v);
            }
            Op::Insert(i, v) => {
                let k = &pool[i];
                let prev = sut.insert(k, v).expect("insert within memory");
                prop_assert_eq!(prev, model.insert(k.clone(), v));
            }
            Op::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k));
            }
            Op::Contains(s) => {
                prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
            }
            Op::Mutate(i, d) => {
                let k = &pool[i];
                match (sut.get_mut(k), model.get_mut(k)) {
                    (Some(sv), Some(mv)) => {
                        *sv = sv.saturating_add(d);
                        *mv = mv.saturating_add(d);
                    }
                    (None, None) => {}
                    _ => prop_assert!(false, "presence mismatch for {:?}", k),
                }
            }
            Op::Iterate => {
                let mut seen = BTreeMap::new();
                for (k, v) in sut.iter() {
                    prop_assert!(seen.insert(k.to_string(), *v).is_none(), "{:?} visited twice", k);
                }
                let want: BTreeMap<String, i32> =
                    model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(seen, want);
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        prop_assert!(sut.capacity().is_power_of_two());
        prop_assert!(sut.len() < sut.capacity());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(Table::new().expect("table"), &pool, ops)?;
    }

    // Small starting capacity so short scenarios still cross several doublings.
    #[test]
    fn prop_state_machine_from_one_slot((pool, ops) in arb_scenario()) {
        run_scenario(Table::with_capacity(1).expect("table"), &pool, ops)?;
    }
}

// Collision variant using a constant hasher so every key starts its probe
// at the same slot.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario(Table::with_hasher(ConstBuildHasher).expect("table"), &pool, ops)?;
    }
}
