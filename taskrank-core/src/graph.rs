//! Dependency graph analysis: circular dependency detection.
//!
//! Edges point from a task to each task it depends on. Traversal is an
//! iterative depth-first search, so long chains cannot overflow the stack.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::warn;

use crate::task::{Task, TaskId};

/// Ids of the tasks that form one dependency loop.
pub type Cycle = BTreeSet<TaskId>;

/// Find every distinct dependency cycle among `tasks`.
///
/// Roots are visited in submission order and neighbors in declared order.
/// A cycle is reported when the search reaches a task already on the current
/// path; it spans that task's position on the path through the back edge.
/// Cycles with the same member set are reported once, in discovery order.
///
/// Dependencies on unknown ids are leaves. If two tasks share an id, the later
/// one's dependencies are used.
pub fn detect_circular_dependencies(tasks: &[Task]) -> Vec<Cycle> {
    let graph: HashMap<&TaskId, &[TaskId]> = tasks
        .iter()
        .map(|t| (&t.id, t.dependencies.as_slice()))
        .collect();

    let mut visited: HashSet<&TaskId> = HashSet::new();
    let mut on_stack: HashSet<&TaskId> = HashSet::new();
    let mut cycles: Vec<Cycle> = Vec::new();

    for root in tasks.iter().map(|t| &t.id) {
        if !visited.insert(root) {
            continue;
        }
        on_stack.insert(root);

        // (node, index of the next neighbor to explore); doubles as the current path.
        let mut stack: Vec<(&TaskId, usize)> = vec![(root, 0)];

        while let Some(&(node, next_idx)) = stack.last() {
            let neighbors = graph.get(node).copied().unwrap_or_default();

            let Some(next) = neighbors.get(next_idx) else {
                stack.pop();
                on_stack.remove(node);
                continue;
            };

            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }

            if visited.insert(next) {
                on_stack.insert(next);
                stack.push((next, 0));
            } else if on_stack.contains(next) {
                let start = stack
                    .iter()
                    .position(|(id, _)| *id == next)
                    .unwrap_or(0);
                let cycle: Cycle = stack[start..].iter().map(|(id, _)| (*id).clone()).collect();
                if !cycles.contains(&cycle) {
                    cycles.push(cycle);
                }
            }
        }
    }

    if !cycles.is_empty() {
        warn!(count = cycles.len(), "circular dependencies detected");
    }

    cycles
}
