//! High-volume pointer arithmetic.

use std::time::Instant;

use crate::common::*;
use ptrcalc::*;

const ELEMENTS: u64 = 100_000;

#[test]
#[ignore]
fn stress_full_walk_and_back() {
    let table = objects(DataLayout::word64(), &[("big", "long[100000]")]);
    let eval = PointerEvaluator::new(&table);
    let base = first(&table, "big");

    let start = Instant::now();
    let mut p = base;
    for i in 0..ELEMENTS {
        p = eval.eval_pointer_add(p, 1).unwrap();
        assert_eq!(eval.eval_pointer_diff(p, base), Ok(i as i64 + 1));
    }
    for _ in 0..ELEMENTS {
        p = eval.eval_pointer_sub(p, 1).unwrap();
    }
    let elapsed = start.elapsed();

    assert_eq!(p, base);
    println!("{} steps each way in {:?}", ELEMENTS, elapsed);
}

#[test]
#[ignore]
fn stress_every_pair_compares_like_its_difference() {
    let table = objects(DataLayout::lp64(), &[("arr", "int[512]")]);
    let eval = PointerEvaluator::new(&table);
    let base = first(&table, "arr");
    let pointers: Vec<TypedPointer> = (0..=512).map(|i| eval.eval_index(base, i).unwrap()).collect();

    for &p in &pointers {
        for &q in &pointers {
            let diff = eval.eval_pointer_diff(p, q).unwrap();
            for op in CompareOp::ALL {
                let expected = op.holds(diff.cmp(&0));
                assert_eq!(eval.eval_pointer_compare(op, p, q), Ok(expected), "{} {} {}", p, op, q);
            }
        }
    }
}

#[test]
#[ignore]
fn stress_many_objects_never_mix() {
    let mut table = ObjectTable::new(DataLayout::ilp32());
    let ids: Vec<ObjectId> = (0..10_000).map(|_| table.define_bytes(None, 64).unwrap()).collect();
    let eval = PointerEvaluator::new(&table);

    for pair in ids.windows(2) {
        let p = TypedPointer::new(Address::start_of(pair[0]), 4).unwrap();
        let q = TypedPointer::new(Address::start_of(pair[1]), 4).unwrap();
        assert!(eval.eval_pointer_diff(p, q).is_err());
        assert_eq!(eval.eval_pointer_compare(CompareOp::Ne, p, q), Ok(true));
    }
}
