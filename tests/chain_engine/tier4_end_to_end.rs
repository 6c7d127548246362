//! Tier 4: end-to-end scenarios across manager, progress and integrity.

use std::sync::Arc;

use questline::{
    ChainError, ChainProgressProjector, CompletionLedger, CycleKind, DependencyEdge,
    EngineConfig, UserId,
};

use crate::test_utils::*;

#[test]
fn c1_scenario_rejects_closing_edge() {
    let mgr = setup();
    let id = chain_with(&mgr, "C1", &[]);

    for i in 1..=3 {
        mgr.add_mission_to_chain(id, m(i)).unwrap();
    }
    let chain = mgr.get_chain(id).unwrap();
    let positions: Vec<(i64, usize)> = chain
        .orders()
        .iter()
        .map(|o| (o.mission_id.get(), o.position))
        .collect();
    assert_eq!(positions, vec![(1, 1), (2, 2), (3, 3)]);

    mgr.add_mission_dependency(id, m(2), m(1)).unwrap();
    mgr.add_mission_dependency(id, m(3), m(2)).unwrap();

    let err = mgr.add_mission_dependency(id, m(1), m(3)).unwrap_err();
    assert!(matches!(
        err,
        ChainError::CircularDependency {
            kind: CycleKind::Transitive { .. },
            ..
        }
    ));

    let chain = mgr.get_chain(id).unwrap();
    let edges: Vec<DependencyEdge> = chain.dependencies.iter().copied().collect();
    assert_eq!(
        edges,
        vec![
            DependencyEdge::new(m(2), m(1)),
            DependencyEdge::new(m(3), m(2)),
        ]
    );
}

#[test]
fn player_progresses_through_chain() {
    let mgr = setup();
    let id = chain_with(&mgr, "Onboarding", &[1, 2, 3]);
    mgr.add_mission_dependency(id, m(2), m(1)).unwrap();
    mgr.add_mission_dependency(id, m(3), m(1)).unwrap();

    let ledger = Arc::new(CompletionLedger::new());
    let projector = ChainProgressProjector::new(Arc::clone(&ledger));
    let player = UserId(7);

    let progress = mgr.compute_progress_for_user(id, player, &projector).unwrap();
    assert_eq!(progress.next_available, ids(&[1]));
    assert!(!progress.chain_is_completed);

    ledger.mark_completed(player, m(1));
    let progress = mgr.compute_progress_for_user(id, player, &projector).unwrap();
    assert_eq!(progress.next_available, ids(&[2, 3]));
    assert_eq!(progress.completed_count, 1);

    ledger.mark_completed(player, m(2));
    ledger.mark_completed(player, m(3));
    let progress = mgr.compute_progress_for_user(id, player, &projector).unwrap();
    assert!(progress.chain_is_completed);
    assert_eq!(progress.total, 3);

    // Adding a mission reopens the chain
    mgr.add_mission_to_chain(id, m(4)).unwrap();
    let progress = mgr.compute_progress_for_user(id, player, &projector).unwrap();
    assert!(!progress.chain_is_completed);
    assert_eq!(progress.next_available, ids(&[4]));
}

#[test]
fn progress_for_missing_chain() {
    let mgr = setup();
    let projector = ChainProgressProjector::new(Arc::new(CompletionLedger::new()));
    assert!(mgr
        .compute_progress_for_user(questline::ChainId(3), UserId(1), &projector)
        .unwrap_err()
        .is_not_found());
}

#[test]
fn catalog_deletion_sweeps_chains() {
    let missions = catalog(10);
    let mgr = questline::in_memory_manager(Arc::clone(&missions), EngineConfig::default());
    let a = chain_with(&mgr, "a", &[1, 2, 3]);
    let b = chain_with(&mgr, "b", &[3, 1]);
    mgr.add_mission_dependency(a, m(3), m(2)).unwrap();
    mgr.add_mission_dependency(a, m(2), m(1)).unwrap();
    mgr.add_mission_dependency(b, m(1), m(3)).unwrap();

    missions.remove(m(3));
    let report = mgr.on_mission_deleted(m(3)).unwrap();
    assert!(report.is_complete());
    assert_eq!(report.modified, vec![a, b]);

    let chain_a = mgr.get_chain(a).unwrap();
    assert_eq!(chain_a.missions, ids(&[1, 2]));
    assert_eq!(chain_a.dependencies.len(), 1);
    let chain_b = mgr.get_chain(b).unwrap();
    assert_eq!(chain_b.missions, ids(&[1]));
    assert!(chain_b.dependencies.is_empty());

    // The mission is gone from the catalog too
    assert!(mgr.add_mission_to_chain(a, m(3)).unwrap_err().is_not_found());
}

#[test]
fn queries_follow_the_graph() {
    let mgr = setup();
    let id = chain_with(&mgr, "q", &[5, 4, 3, 2, 1]);
    mgr.add_mission_dependency(id, m(5), m(4)).unwrap();
    mgr.add_mission_dependency(id, m(4), m(2)).unwrap();
    mgr.add_mission_dependency(id, m(3), m(2)).unwrap();

    let mut prereqs = mgr.prerequisites(id, m(5)).unwrap();
    prereqs.sort();
    assert_eq!(prereqs, ids(&[2, 4]));

    let order = mgr.topological_order(id).unwrap();
    let pos = |x: i64| order.iter().position(|o| *o == m(x)).unwrap();
    assert!(pos(2) < pos(4));
    assert!(pos(4) < pos(5));
    assert!(pos(2) < pos(3));
}
