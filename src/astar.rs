//! Hint search: A* over board states guided by the Manhattan distance.
//!
//! The heuristic is consistent, so a state can be marked visited as soon as it
//! is queued without losing optimality. Swapping in an inconsistent heuristic
//! would require reopening visited states.

use crate::puzzle::Puzzle;
use log::debug;
use rustc_hash::FxHashSet;
use std::{cmp::Reverse, collections::BinaryHeap};

/// The first steps of an optimal path from the searched board.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Hint {
    /// States after each move, excluding the start. Empty when no path was found.
    pub steps: Vec<Puzzle>,
    /// Length of the whole optimal path, when the goal was reached.
    pub solution_len: Option<usize>,
}

impl Hint {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// True when following every step ends on the solved board.
    pub fn reaches_goal(&self) -> bool {
        self.steps.last().is_some_and(Puzzle::is_solved)
    }
}

struct Node {
    state: Puzzle,
    parent: Option<usize>,
    cost: usize,
}

/// Search for up to `max_len` steps toward the solved board.
pub fn hint(start: &Puzzle, max_len: usize) -> Hint {
    hint_with_budget(start, max_len, None)
}

/// As [`hint`], giving up with an empty hint after `budget` expansions.
pub fn hint_with_budget(start: &Puzzle, max_len: usize, budget: Option<usize>) -> Hint {
    if !start.is_solvable() {
        debug!("astar: start is in the unsolvable parity class");
        return Hint::default();
    }

    // nodes are stored in insertion order, so the index doubles as the tie-break
    let mut nodes = vec![Node {
        state: *start,
        parent: None,
        cost: 0,
    }];
    let mut frontier = BinaryHeap::from([Reverse((start.manhattan_distance(), 0))]);
    let mut visited = FxHashSet::default();
    visited.insert(start.key());
    let mut expanded = 0;

    while let Some(Reverse((_, index))) = frontier.pop() {
        let Node { state, cost, .. } = nodes[index];

        if state.is_solved() {
            debug!("astar: {} moves to goal, {} nodes expanded", cost, expanded);
            return Hint {
                steps: path_to(&nodes, index).into_iter().take(max_len).collect(),
                solution_len: Some(cost),
            };
        }

        if budget.is_some_and(|limit| expanded >= limit) {
            debug!("astar: node budget of {} exhausted", expanded);
            return Hint::default();
        }
        expanded += 1;

        for next in state.successors() {
            if !visited.insert(next.key()) {
                continue;
            }
            let priority = cost + 1 + next.manhattan_distance();
            frontier.push(Reverse((priority, nodes.len())));
            nodes.push(Node {
                state: next,
                parent: Some(index),
                cost: cost + 1,
            });
        }
    }

    debug!("astar: frontier exhausted after {} expansions", expanded);
    Hint::default()
}

/// States from the first move after the root up to `index`, in play order.
fn path_to(nodes: &[Node], mut index: usize) -> Vec<Puzzle> {
    let mut path = Vec::with_capacity(nodes[index].cost);
    while let Some(parent) = nodes[index].parent {
        path.push(nodes[index].state);
        index = parent;
    }
    path.reverse();
    path
}
