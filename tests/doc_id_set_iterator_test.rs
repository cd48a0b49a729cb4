//! Cursor contract checks run against every cursor implementation.

use std::collections::BTreeSet;

use docset::prelude::*;
use docset::search::{
    AllDocsIterator, ConjunctionIterator, DisjunctionIterator, EmptyDocIdSetIterator,
    SortedDocIdIterator,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A cursor owning its ids that relies on the default linear `advance`.
#[derive(Debug)]
struct Owned {
    docs: Vec<DocId>,
    index: Option<usize>,
}

impl Owned {
    fn boxed(docs: &[DocId]) -> Box<dyn DocIdSetIterator> {
        Box::new(Owned {
            docs: docs.to_vec(),
            index: None,
        })
    }
}

impl DocIdSetIterator for Owned {
    fn doc_id(&self) -> Option<DocId> {
        self.index
            .map(|i| self.docs.get(i).copied().unwrap_or(NO_MORE_DOCS))
    }

    fn next_doc(&mut self) -> DocId {
        let next = self.index.map_or(0, |i| i + 1).min(self.docs.len());
        self.index = Some(next);
        self.docs.get(next).copied().unwrap_or(NO_MORE_DOCS)
    }

    fn cost(&self) -> u64 {
        self.docs.len() as u64
    }
}

fn random_ids(rng: &mut StdRng, upper: DocId, density: f64) -> Vec<DocId> {
    (0..upper).filter(|_| rng.random_bool(density)).collect()
}

fn first_at_or_after(expected: &[DocId], target: DocId) -> DocId {
    let index = expected.partition_point(|&doc| doc < target);
    expected.get(index).copied().unwrap_or(NO_MORE_DOCS)
}

/// Check the full cursor contract for cursors built by `make`.
fn check_contract<'a>(
    name: &str,
    make: impl Fn() -> Box<dyn DocIdSetIterator + 'a>,
    expected: &[DocId],
    rng: &mut StdRng,
) {
    // Plain iteration: strictly increasing, then exhausted for good.
    let mut cursor = make();
    assert_eq!(cursor.doc_id(), None, "{name}: unstarted");
    let mut seen = Vec::new();
    loop {
        let doc = cursor.next_doc();
        if doc == NO_MORE_DOCS {
            break;
        }
        assert_eq!(cursor.doc_id(), Some(doc), "{name}: doc_id tracks next_doc");
        if let Some(&last) = seen.last() {
            assert!(doc > last, "{name}: {doc} after {last}");
        }
        seen.push(doc);
    }
    assert_eq!(seen, expected, "{name}: emitted ids");
    for _ in 0..3 {
        assert_eq!(cursor.next_doc(), NO_MORE_DOCS, "{name}: stays exhausted");
    }
    assert!(cursor.is_exhausted());
    assert_eq!(cursor.advance(NO_MORE_DOCS), NO_MORE_DOCS);

    // Advancing agrees with a linear scan, interleaved with next_doc.
    for round in 0..20 {
        let mut cursor = make();
        let mut target = rng.random_range(0..8);
        loop {
            let want = first_at_or_after(expected, target);
            let got = cursor.advance(target);
            assert_eq!(got, want, "{name}: round {round}, advance({target})");
            if got == NO_MORE_DOCS {
                break;
            }
            if rng.random_bool(0.3) {
                let want = first_at_or_after(expected, got + 1);
                assert_eq!(cursor.next_doc(), want, "{name}: next_doc after {got}");
                if want == NO_MORE_DOCS {
                    break;
                }
                target = want + rng.random_range(1..20);
            } else {
                target = got + rng.random_range(1..20);
            }
        }
        assert_eq!(cursor.next_doc(), NO_MORE_DOCS);
    }
}

#[test]
fn test_empty_cursor_contract() {
    let mut rng = StdRng::seed_from_u64(1);
    check_contract(
        "empty",
        || Box::new(EmptyDocIdSetIterator::new()),
        &[],
        &mut rng,
    );
}

#[test]
fn test_all_docs_cursor_contract() {
    let mut rng = StdRng::seed_from_u64(2);
    let expected: Vec<DocId> = (0..75).collect();
    check_contract(
        "all docs",
        || Box::new(AllDocsIterator::new(75)),
        &expected,
        &mut rng,
    );
    check_contract("all docs of none", || Box::new(AllDocsIterator::new(0)), &[], &mut rng);
}

#[test]
fn test_sorted_cursor_contract() {
    let mut rng = StdRng::seed_from_u64(3);
    for density in [0.02, 0.3, 0.9] {
        let ids = random_ids(&mut rng, 500, density);
        check_contract(
            "sorted",
            || Box::new(SortedDocIdIterator::new(&ids)),
            &ids,
            &mut rng,
        );
    }
}

#[test]
fn test_bit_set_cursor_contract() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(4);
    for density in [0.01, 0.5] {
        let ids = random_ids(&mut rng, 700, density);
        let bits = OpenBitSet::from_doc_ids(700, ids.iter().copied())?;
        check_contract("bit set", || Box::new(bits.iterator()), &ids, &mut rng);
    }
    Ok(())
}

#[test]
fn test_conjunction_cursor_contract() {
    let mut rng = StdRng::seed_from_u64(5);
    let a = random_ids(&mut rng, 400, 0.5);
    let b = random_ids(&mut rng, 400, 0.4);
    let c = random_ids(&mut rng, 400, 0.7);

    let expected: Vec<DocId> = {
        let b: BTreeSet<DocId> = b.iter().copied().collect();
        let c: BTreeSet<DocId> = c.iter().copied().collect();
        a.iter()
            .copied()
            .filter(|doc| b.contains(doc) && c.contains(doc))
            .collect()
    };
    check_contract(
        "conjunction",
        || {
            Box::new(ConjunctionIterator::new(vec![
                Owned::boxed(&a),
                Owned::boxed(&b),
                Owned::boxed(&c),
            ]))
        },
        &expected,
        &mut rng,
    );
    check_contract(
        "conjunction of nothing",
        || Box::new(ConjunctionIterator::new(Vec::new())),
        &[],
        &mut rng,
    );
}

#[test]
fn test_disjunction_cursor_contract() {
    let mut rng = StdRng::seed_from_u64(6);
    let a = random_ids(&mut rng, 400, 0.05);
    let b = random_ids(&mut rng, 400, 0.1);
    let c = random_ids(&mut rng, 600, 0.02);

    let expected: Vec<DocId> = a
        .iter()
        .chain(&b)
        .chain(&c)
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    check_contract(
        "disjunction",
        || {
            Box::new(DisjunctionIterator::new(vec![
                Owned::boxed(&a),
                Owned::boxed(&b),
                Owned::boxed(&c),
                Owned::boxed(&[]),
            ]))
        },
        &expected,
        &mut rng,
    );
}

#[test]
fn test_default_advance_contract() {
    let mut rng = StdRng::seed_from_u64(7);
    let ids = random_ids(&mut rng, 300, 0.2);
    check_contract("linear", || Owned::boxed(&ids), &ids, &mut rng);
}

#[test]
fn test_nested_boolean_cursors() -> Result<()> {
    let left = OpenBitSet::from_doc_ids(64, [1, 5, 9, 20, 40])?;
    let union = DisjunctionIterator::new(vec![Owned::boxed(&[5, 9]), Owned::boxed(&[40, 41])]);
    let union: Box<dyn DocIdSetIterator> = Box::new(union);

    let mut set = OpenBitSetDisi::from(left);
    set.in_place_and(&mut ConjunctionIterator::new(vec![
        union,
        Owned::boxed(&[0, 5, 40, 63]),
    ]));
    assert_eq!(set.ones().collect::<Vec<_>>(), vec![5, 40]);
    Ok(())
}

#[test]
fn test_into_doc_ids_collects_remaining() {
    let ids = [3, 8, 13, 21];
    let mut cursor = SortedDocIdIterator::new(&ids);
    assert_eq!(cursor.next_doc(), 3);

    let rest: Vec<DocId> = cursor.into_doc_ids().collect();
    assert_eq!(rest, vec![8, 13, 21]);
}
