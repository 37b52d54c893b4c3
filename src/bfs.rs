//! Exact distance to the solved board by level-order search.
//!
//! The state graph is factorially large, so this is only practical for boards a
//! few tens of moves from the goal at most. It is meant for difficulty rating,
//! not for per-move hints.

use crate::puzzle::Puzzle;
use log::debug;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// Minimum number of moves from `start` to the solved board, or `None` if the
/// goal cannot be reached.
pub fn min_solution_length(start: &Puzzle) -> Option<usize> {
    search(start, usize::MAX)
}

/// As [`min_solution_length`], but gives up on anything deeper than `max_depth`.
pub fn min_solution_length_within(start: &Puzzle, max_depth: usize) -> Option<usize> {
    search(start, max_depth)
}

fn search(start: &Puzzle, max_depth: usize) -> Option<usize> {
    // the other half of the state space never reaches the goal
    if !start.is_solvable() {
        debug!("bfs: start is in the unsolvable parity class");
        return None;
    }

    let mut queue = VecDeque::from([(*start, 0)]);
    let mut visited = FxHashSet::default();
    visited.insert(start.key());

    while let Some((state, depth)) = queue.pop_front() {
        if state.is_solved() {
            debug!("bfs: distance {} after visiting {} states", depth, visited.len());
            return Some(depth);
        }
        if depth >= max_depth {
            continue;
        }

        for next in state.successors() {
            if visited.insert(next.key()) {
                queue.push_back((next, depth + 1));
            }
        }
    }

    debug!("bfs: exhausted {} states without reaching the goal", visited.len());
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn goal_is_zero_moves_away() {
        assert_eq!(min_solution_length(&Puzzle::new()), Some(0));
    }

    #[test]
    fn one_move_from_goal() {
        let puzzle = Puzzle::new().apply(14);
        assert_eq!(min_solution_length(&puzzle), Some(1));
    }

    #[rstest]
    #[case::two(&[14, 10], 2)]
    #[case::loop_back(&[14, 10, 11, 15], 4)]
    #[case::undone(&[14, 13, 14], 1)]
    #[case::five(&[11, 7, 6, 10, 9], 5)]
    fn walked_boards(#[case] walk: &[usize], #[case] expected: usize) {
        let puzzle = walk.iter().fold(Puzzle::new(), |p, &index| p.apply(index));
        assert_eq!(min_solution_length(&puzzle), Some(expected));
    }

    #[test]
    fn depth_bound_cuts_the_search() {
        let puzzle = [11, 7, 6, 10, 9]
            .iter()
            .fold(Puzzle::new(), |p, &index| p.apply(index));
        assert_eq!(min_solution_length_within(&puzzle, 4), None);
        assert_eq!(min_solution_length_within(&puzzle, 5), Some(5));
    }

    #[test]
    fn unsolvable_board_is_unreachable() {
        let puzzle: Puzzle = "2 1 3 4 5 6 7 8 9 10 11 12 13 14 15 _".parse().unwrap();
        assert_eq!(min_solution_length(&puzzle), None);
    }
}
