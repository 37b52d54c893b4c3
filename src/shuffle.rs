use crate::{bfs::min_solution_length_within, config::PuzzleConfig, puzzle::Puzzle};
use log::{debug, warn};
use rand::Rng;

const MAX_ATTEMPTS: usize = 100;

/// Random walk of `steps` legal moves from the solved board.
///
/// Every step is a legal move, so the result is always solvable. No parity
/// check is needed.
pub fn scramble<R: Rng>(rng: &mut R, steps: usize) -> Puzzle {
    scramble_by(steps, |moves| moves[rng.gen_range(0..moves.len())])
}

/// Walk driven by `choose`, which picks one of the offered board indices at
/// each step. The indices are offered in [`Puzzle::legal_moves`] order.
pub fn scramble_by<F>(steps: usize, mut choose: F) -> Puzzle
where
    F: FnMut(&[usize]) -> usize,
{
    let mut puzzle = Puzzle::new();
    let mut moves = Vec::with_capacity(4);

    for _ in 0..steps {
        moves.clear();
        moves.extend(puzzle.legal_moves());
        puzzle = puzzle.apply(choose(&moves));
    }

    puzzle
}

/// Scramble, retrying until the board needs at least `floor` moves.
///
/// The check is a breadth-first search bounded at `floor - 1`, so it never
/// looks deeper than the floor itself. After a fixed number of failed attempts
/// a plain scramble is returned.
pub fn scramble_with_floor<R: Rng>(rng: &mut R, steps: usize, floor: u32) -> Puzzle {
    let Some(bound) = (floor as usize).checked_sub(1) else {
        return scramble(rng, steps);
    };

    for attempt in 1..=MAX_ATTEMPTS {
        let puzzle = scramble(rng, steps);
        match min_solution_length_within(&puzzle, bound) {
            None => {
                debug!("attempt {}: no solution shorter than {} moves", attempt, floor);
                return puzzle;
            }
            Some(moves) => debug!("attempt {}: solvable in {} moves", attempt, moves),
        }
    }

    warn!(
        "no board needing {} moves found in {} attempts, using a plain scramble",
        floor, MAX_ATTEMPTS
    );
    scramble(rng, steps)
}

/// Starting board for a new game under `config`.
pub fn generate<R: Rng>(rng: &mut R, config: &PuzzleConfig) -> Puzzle {
    match config.min_difficulty {
        Some(floor) => scramble_with_floor(rng, config.shuffle_steps, floor),
        None => scramble(rng, config.shuffle_steps),
    }
}
