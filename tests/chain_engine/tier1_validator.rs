//! Tier 1: the dependency validator on raw edge sets.

use std::collections::BTreeSet;

use questline::{would_create_cycle, CycleVerdict, DependencyEdge};

use crate::test_utils::*;

fn e(a: i64, b: i64) -> DependencyEdge {
    DependencyEdge::new(m(a), m(b))
}

#[test]
fn self_loop_on_any_graph() {
    for edges in [vec![], vec![e(1, 2)], vec![e(1, 2), e(2, 3)]] {
        for x in 1..=4 {
            assert_eq!(
                would_create_cycle(&edges, e(x, x)),
                CycleVerdict::SelfDependency
            );
        }
    }
}

#[test]
fn cycles_of_every_length_are_detected() {
    for len in 2..=30 {
        // 1 -> 2 -> ... -> len
        let edges: Vec<_> = (1..len).map(|i| e(i, i + 1)).collect();
        let verdict = would_create_cycle(&edges, e(len, 1));
        match verdict {
            CycleVerdict::ClosesCycle { path } => {
                assert_eq!(path.len() as i64, len);
                assert_eq!(path.first(), Some(&m(1)));
                assert_eq!(path.last(), Some(&m(len)));
            }
            other => panic!("length {}: expected cycle, got {:?}", len, other),
        }
    }
}

#[test]
fn validator_does_not_mutate_input() {
    let edges: BTreeSet<_> = [e(1, 2), e(2, 3)].into_iter().collect();
    let snapshot = edges.clone();
    let _ = would_create_cycle(&edges, e(3, 1));
    let _ = would_create_cycle(&edges, e(4, 1));
    assert_eq!(edges, snapshot);
}

#[test]
fn diamond_accepts_parallel_paths() {
    // 1 depends on 2 and 3, both depend on 4
    let edges = vec![e(1, 2), e(1, 3), e(2, 4)];
    assert_eq!(would_create_cycle(&edges, e(3, 4)), CycleVerdict::Acyclic);
    assert!(would_create_cycle(&edges, e(4, 1)).is_cycle());
}

#[test]
fn verdict_is_deterministic() {
    let edges: Vec<_> = vec![e(1, 2), e(1, 3), e(2, 4), e(3, 4)];
    let first = would_create_cycle(&edges, e(4, 1));
    for _ in 0..10 {
        assert_eq!(would_create_cycle(&edges, e(4, 1)), first);
    }
}
