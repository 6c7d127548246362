//! Tier 5: concurrent mutations.
//!
//! Structural mutations on one chain are serialised, so validation never runs
//! against a stale edge set. Mutations on different chains proceed in parallel.

use std::sync::{Arc, Barrier};
use std::thread;

use parking_lot::Mutex;
use questline::{check_acyclic, ChainError, MissionId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::test_utils::*;

/// Run `jobs` concurrently behind a barrier and collect their results.
fn race<T, F>(jobs: Vec<F>) -> Vec<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let barrier = Arc::new(Barrier::new(jobs.len()));
    let handles: Vec<_> = jobs
        .into_iter()
        .map(|job| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                job()
            })
        })
        .collect();
    handles.into_iter().map(|h| h.join().unwrap()).collect()
}

#[test]
fn opposite_edges_at_most_one_wins() {
    for round in 0..50 {
        let mgr = Arc::new(setup());
        let id = chain_with(&mgr, &format!("race-{}", round), &[1, 2]);

        let a = Arc::clone(&mgr);
        let b = Arc::clone(&mgr);
        let jobs: Vec<Box<dyn FnOnce() -> Result<(), ChainError> + Send>> = vec![
            Box::new(move || a.add_mission_dependency(id, m(1), m(2)).map(|_| ())),
            Box::new(move || b.add_mission_dependency(id, m(2), m(1)).map(|_| ())),
        ];
        let results = race(jobs);

        let wins = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(wins, 1, "round {}: {:?}", round, results);
        assert!(results.iter().any(|r| matches!(r, Err(e) if e.is_circular())));
        assert_eq!(mgr.get_chain(id).unwrap().dependencies.len(), 1);
    }
}

#[test]
fn jointly_cyclic_edges_at_most_one_wins() {
    for round in 0..50 {
        let mgr = Arc::new(setup());
        let id = chain_with(&mgr, &format!("tri-{}", round), &[1, 2, 3]);
        mgr.add_mission_dependency(id, m(1), m(2)).unwrap();

        // Each edge is fine alone; together they close 1 -> 2 -> 3 -> 1
        let a = Arc::clone(&mgr);
        let b = Arc::clone(&mgr);
        let jobs: Vec<Box<dyn FnOnce() -> Result<(), ChainError> + Send>> = vec![
            Box::new(move || a.add_mission_dependency(id, m(2), m(3)).map(|_| ())),
            Box::new(move || b.add_mission_dependency(id, m(3), m(1)).map(|_| ())),
        ];
        let results = race(jobs);

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let chain = mgr.get_chain(id).unwrap();
        assert_eq!(chain.dependencies.len(), 2);
        assert!(check_acyclic(&chain.missions, &chain.dependencies).is_ok());
    }
}

#[test]
fn random_edge_storm_stays_acyclic() {
    const THREADS: usize = 8;
    const MISSIONS: i64 = 12;

    let mgr = Arc::new(setup());
    let members: Vec<i64> = (1..=MISSIONS).collect();
    let id = chain_with(&mgr, "storm", &members);
    let accepted = Arc::new(Mutex::new(Vec::new()));

    let jobs: Vec<_> = (0..THREADS)
        .map(|t| {
            let mgr = Arc::clone(&mgr);
            let accepted = Arc::clone(&accepted);
            move || {
                let mut rng = StdRng::seed_from_u64(t as u64);
                for _ in 0..200 {
                    let a = rng.gen_range(1..=MISSIONS);
                    let b = rng.gen_range(1..=MISSIONS);
                    if mgr.add_mission_dependency(id, m(a), m(b)).is_ok() {
                        accepted.lock().push((a, b));
                    }
                }
            }
        })
        .collect();
    race(jobs);

    let chain = mgr.get_chain(id).unwrap();
    assert!(check_acyclic(&chain.missions, &chain.dependencies).is_ok());
    assert_eq!(chain.dependencies.len(), accepted.lock().len());
}

#[test]
fn same_mission_added_once() {
    let mgr = Arc::new(setup());
    let id = chain_with(&mgr, "dup", &[]);

    let jobs: Vec<_> = (0..8)
        .map(|_| {
            let mgr = Arc::clone(&mgr);
            move || mgr.add_mission_to_chain(id, m(1)).is_ok()
        })
        .collect();
    let wins = race(jobs).into_iter().filter(|ok| *ok).count();

    assert_eq!(wins, 1);
    assert_eq!(mgr.get_chain(id).unwrap().missions, ids(&[1]));
}

#[test]
fn different_chains_proceed_independently() {
    let mgr = Arc::new(setup());
    let chain_ids: Vec<_> = (0..6)
        .map(|i| chain_with(&mgr, &format!("solo-{}", i), &[]))
        .collect();

    let jobs: Vec<_> = chain_ids
        .iter()
        .map(|id| {
            let mgr = Arc::clone(&mgr);
            let id = *id;
            move || {
                for i in 1..=20 {
                    mgr.add_mission_to_chain(id, MissionId(i)).unwrap();
                    if i > 1 {
                        mgr.add_mission_dependency(id, MissionId(i), MissionId(i - 1))
                            .unwrap();
                    }
                }
            }
        })
        .collect();
    race(jobs);

    for id in chain_ids {
        let chain = mgr.get_chain(id).unwrap();
        assert_eq!(chain.len(), 20);
        assert_eq!(chain.dependencies.len(), 19);
        assert_eq!(chain.version, 39);
    }
}

#[test]
fn reorders_and_removals_keep_positions_dense() {
    let mgr = Arc::new(setup());
    let members: Vec<i64> = (1..=20).collect();
    let id = chain_with(&mgr, "shuffle", &members);

    let jobs: Vec<_> = (0..4)
        .map(|t| {
            let mgr = Arc::clone(&mgr);
            move || {
                let mut rng = StdRng::seed_from_u64(100 + t as u64);
                for _ in 0..100 {
                    let mission = m(rng.gen_range(1..=20));
                    if rng.gen_bool(0.1) {
                        let _ = mgr.remove_mission_from_chain(id, mission);
                    } else {
                        let _ = mgr.update_mission_order(id, mission, rng.gen_range(1..=20));
                    }
                }
            }
        })
        .collect();
    race(jobs);

    let chain = mgr.get_chain(id).unwrap();
    chain.check_invariants().unwrap();
    let positions: Vec<usize> = chain.orders().iter().map(|o| o.position).collect();
    assert_eq!(positions, (1..=chain.len()).collect::<Vec<_>>());
}
