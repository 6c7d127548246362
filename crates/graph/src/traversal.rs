//! Graph traversal: path search, transitive closures, topological order.
//!
//! All searches are iterative (explicit stack or queue plus a visited set) so
//! stack depth stays constant no matter how long a chain gets.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use questline_core::{ChainError, ChainResult, DependencyEdge, MissionId};
use rustc_hash::{FxHashMap, FxHashSet};

use super::adjacency::DependencyIndex;

impl DependencyIndex {
    /// Find a path from `start` to `target` following "depends on" edges.
    ///
    /// Returns the missions along the path, `start` first and `target` last,
    /// or None if `target` is unreachable. A mission trivially reaches itself.
    pub fn path_between(&self, start: MissionId, target: MissionId) -> Option<Vec<MissionId>> {
        if start == target {
            return Some(vec![start]);
        }

        let mut parent: FxHashMap<MissionId, MissionId> = FxHashMap::default();
        let mut seen: FxHashSet<MissionId> = FxHashSet::default();
        let mut stack: Vec<MissionId> = vec![start];
        seen.insert(start);

        while let Some(current) = stack.pop() {
            for &next in self.prerequisites(current) {
                if !seen.insert(next) {
                    continue;
                }
                parent.insert(next, current);
                if next == target {
                    return Some(unwind(&parent, start, target));
                }
                stack.push(next);
            }
        }

        None
    }

    /// Every mission `mission` transitively depends on, in BFS discovery order.
    pub fn prerequisite_closure(&self, mission: MissionId) -> Vec<MissionId> {
        self.bfs(mission, Walk::Prerequisites)
    }

    /// Every mission that transitively depends on `mission`, in BFS discovery order.
    pub fn dependant_closure(&self, mission: MissionId) -> Vec<MissionId> {
        self.bfs(mission, Walk::Dependants)
    }

    fn bfs(&self, start: MissionId, walk: Walk) -> Vec<MissionId> {
        let mut visited = Vec::new();
        let mut seen: FxHashSet<MissionId> = FxHashSet::default();
        let mut queue: VecDeque<MissionId> = VecDeque::new();

        seen.insert(start);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            let neighbors = match walk {
                Walk::Prerequisites => self.prerequisites(current),
                Walk::Dependants => self.dependants(current),
            };
            for &neighbor in neighbors {
                if seen.insert(neighbor) {
                    visited.push(neighbor);
                    queue.push_back(neighbor);
                }
            }
        }

        visited
    }
}

#[derive(Clone, Copy)]
enum Walk {
    Prerequisites,
    Dependants,
}

fn unwind(
    parent: &FxHashMap<MissionId, MissionId>,
    start: MissionId,
    target: MissionId,
) -> Vec<MissionId> {
    let mut path = vec![target];
    let mut current = target;
    while current != start {
        match parent.get(&current) {
            Some(&p) => {
                path.push(p);
                current = p;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

/// Order `missions` so that every prerequisite precedes its dependants.
///
/// Ties are broken by the input order, so a chain whose display order already
/// respects its dependencies comes back unchanged. Fails with
/// `InvariantViolation` if the edges form a cycle or reference a mission not
/// in `missions`.
pub fn topological_order<'a, I>(missions: &[MissionId], edges: I) -> ChainResult<Vec<MissionId>>
where
    I: IntoIterator<Item = &'a DependencyEdge>,
{
    let rank: FxHashMap<MissionId, usize> = missions
        .iter()
        .enumerate()
        .map(|(i, m)| (*m, i))
        .collect();

    let mut index = DependencyIndex::new();
    for edge in edges {
        if !rank.contains_key(&edge.mission_id) || !rank.contains_key(&edge.prerequisite_id) {
            return Err(ChainError::invariant(format!(
                "dependency {} -> {} references an unknown mission",
                edge.mission_id, edge.prerequisite_id
            )));
        }
        index.add_edge(*edge);
    }

    // Kahn's algorithm; a mission is ready once all its prerequisites are placed
    let mut pending: FxHashMap<MissionId, usize> = missions
        .iter()
        .map(|m| (*m, index.prerequisites(*m).len()))
        .collect();
    let mut ready: BinaryHeap<Reverse<(usize, MissionId)>> = missions
        .iter()
        .filter(|m| pending.get(*m).copied() == Some(0))
        .map(|m| Reverse((rank[m], *m)))
        .collect();

    let mut order = Vec::with_capacity(missions.len());
    while let Some(Reverse((_, mission))) = ready.pop() {
        order.push(mission);
        for &dependant in index.dependants(mission) {
            if let Some(count) = pending.get_mut(&dependant) {
                *count -= 1;
                if *count == 0 {
                    ready.push(Reverse((rank[&dependant], dependant)));
                }
            }
        }
    }

    if order.len() != missions.len() {
        let mut stuck: Vec<MissionId> = pending
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(m, _)| m)
            .collect();
        stuck.sort();
        let rendered: Vec<String> = stuck.iter().map(|m| m.to_string()).collect();
        return Err(ChainError::invariant(format!(
            "dependency cycle among missions [{}]",
            rendered.join(", ")
        )));
    }

    Ok(order)
}

/// Verify that `edges` form a DAG over `missions`.
pub fn check_acyclic<'a, I>(missions: &[MissionId], edges: I) -> ChainResult<()>
where
    I: IntoIterator<Item = &'a DependencyEdge>,
{
    topological_order(missions, edges).map(|_| ())
}
