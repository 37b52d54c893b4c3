//! The live game: one session, the moves that change it and hint auto-play.

use crate::{
    astar::hint_with_budget,
    config::PuzzleConfig,
    error::Result,
    puzzle::Puzzle,
    shuffle::generate,
};
use log::{debug, info, trace};
use rand::{rngs::StdRng, SeedableRng};
use std::{collections::VecDeque, time::Duration};

/// Timer used to pace hint auto-play. The owner of the clock calls
/// [`Controller::tick`] once the scheduled delay has elapsed.
pub trait Ticker {
    /// Arrange for one tick after `after`, replacing any pending one.
    fn schedule(&mut self, after: Duration);
    /// Drop any pending tick. Calling this with nothing pending is a no-op.
    fn cancel(&mut self);
}

/// A ticker that never fires, for callers that don't want auto-play.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTicker;

impl Ticker for NoTicker {
    fn schedule(&mut self, _after: Duration) {}
    fn cancel(&mut self) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    puzzle: Puzzle,
    moves: u32,
    solved: bool,
    hint: VecDeque<Puzzle>,
}

impl Session {
    /// A fresh game starts unsolved with no moves and no queued hint.
    fn new(puzzle: Puzzle) -> Self {
        Self {
            puzzle,
            moves: 0,
            solved: false,
            hint: VecDeque::new(),
        }
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    pub fn has_pending_hint(&self) -> bool {
        !self.hint.is_empty()
    }

    /// Queued hint states still to be played.
    pub fn pending_hint(&self) -> impl Iterator<Item = &Puzzle> {
        self.hint.iter()
    }

    fn advance(&mut self, puzzle: Puzzle) {
        self.puzzle = puzzle;
        self.moves += 1;
        self.solved = puzzle.is_solved();
    }
}

/// Owns the session. It is only changed through [`Controller::reset`],
/// [`Controller::request_move`], [`Controller::request_hint`] and
/// [`Controller::tick`].
pub struct Controller<T> {
    config: PuzzleConfig,
    rng: StdRng,
    ticker: T,
    session: Session,
}

impl<T: Ticker> Controller<T> {
    pub fn new(config: PuzzleConfig, ticker: T) -> Result<Self> {
        config.validate()?;
        let mut rng = rng_for(&config);
        let session = Session::new(deal(&mut rng, &config));

        Ok(Self {
            config,
            rng,
            ticker,
            session,
        })
    }

    /// Start from a given board instead of a scramble. Later resets scramble as usual.
    pub fn with_puzzle(config: PuzzleConfig, ticker: T, puzzle: Puzzle) -> Result<Self> {
        config.validate()?;
        let rng = rng_for(&config);

        Ok(Self {
            config,
            rng,
            ticker,
            session: Session::new(puzzle),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn reset(&mut self) {
        self.ticker.cancel();
        self.session = Session::new(deal(&mut self.rng, &self.config));
        info!("new game:\n{}", self.session.puzzle);
    }

    /// Slide the tile at `index` into the blank. Returns `false`, changing
    /// nothing, if that tile is not next to the blank.
    pub fn request_move(&mut self, index: usize) -> bool {
        let Some(next) = self.session.puzzle.try_apply(index) else {
            return false;
        };

        self.ticker.cancel();
        self.session.hint.clear();
        self.session.advance(next);
        if self.session.solved {
            info!("solved in {} moves", self.session.moves);
        }
        true
    }

    /// Queue hint steps for auto-play and return how many were queued.
    pub fn request_hint(&mut self) -> usize {
        if self.session.solved {
            return 0;
        }

        let hint = hint_with_budget(
            &self.session.puzzle,
            self.config.hint_len,
            self.config.hint_node_budget,
        );
        info!(
            "hint: {} steps queued, {:?} moves to solve",
            hint.steps.len(),
            hint.solution_len
        );

        self.session.hint = hint.steps.into();
        if self.session.hint.is_empty() {
            self.ticker.cancel();
        } else {
            self.ticker.schedule(self.config.hint_interval);
        }
        self.session.hint.len()
    }

    /// Play the next queued hint step. Returns `false` if nothing was queued.
    pub fn tick(&mut self) -> bool {
        let Some(next) = self.session.hint.pop_front() else {
            self.ticker.cancel();
            return false;
        };

        self.session.advance(next);
        trace!("auto-play: {} steps left", self.session.hint.len());

        if self.session.solved {
            info!("solved in {} moves", self.session.moves);
            self.session.hint.clear();
        }
        if self.session.hint.is_empty() {
            self.ticker.cancel();
        } else {
            self.ticker.schedule(self.config.hint_interval);
        }
        true
    }
}

fn rng_for(config: &PuzzleConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Scramble, drawing again whenever the walk lands back on the solved board.
fn deal(rng: &mut StdRng, config: &PuzzleConfig) -> Puzzle {
    loop {
        let puzzle = generate(rng, config);
        if !puzzle.is_solved() {
            return puzzle;
        }
        debug!("scramble returned to the solved board, drawing again");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[derive(Debug, Default)]
    struct ManualTicker {
        pending: Option<Duration>,
        schedules: usize,
        cancels: usize,
    }

    impl Ticker for ManualTicker {
        fn schedule(&mut self, after: Duration) {
            self.pending = Some(after);
            self.schedules += 1;
        }

        fn cancel(&mut self) {
            self.pending = None;
            self.cancels += 1;
        }
    }

    fn seeded() -> PuzzleConfig {
        PuzzleConfig {
            seed: Some(11),
            ..Default::default()
        }
    }

    fn controller_at(indices: &[usize]) -> Controller<ManualTicker> {
        let puzzle = indices.iter().fold(Puzzle::new(), |p, &index| p.apply(index));
        Controller::with_puzzle(seeded(), ManualTicker::default(), puzzle).unwrap()
    }

    #[test]
    fn rejects_invalid_config() {
        let config = PuzzleConfig {
            hint_len: 0,
            ..Default::default()
        };
        assert!(matches!(
            Controller::new(config, NoTicker),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn seeded_games_start_identically() {
        let a = Controller::new(seeded(), NoTicker).unwrap();
        let b = Controller::new(seeded(), NoTicker).unwrap();
        assert_eq!(a.session(), b.session());
        assert_eq!(a.session().moves(), 0);
        assert!(a.session().puzzle().is_solvable());
    }

    #[test]
    fn illegal_move_changes_nothing() {
        let mut controller = controller_at(&[14]);
        let before = controller.session().clone();
        assert!(!controller.request_move(0));
        assert!(!controller.request_move(14));
        assert!(!controller.request_move(99));
        assert_eq!(controller.session(), &before);
    }

    #[test]
    fn legal_move_counts_and_solves() {
        let mut controller = controller_at(&[14, 10]);
        assert!(controller.request_move(14));
        assert_eq!(controller.session().moves(), 1);
        assert!(!controller.session().is_solved());
        assert!(controller.request_move(15));
        assert_eq!(controller.session().moves(), 2);
        assert!(controller.session().is_solved());
    }

    #[test]
    fn hint_plays_out_on_ticks() {
        let mut controller = controller_at(&[11, 7, 6, 10, 9]);
        assert_eq!(controller.request_hint(), 5);
        assert!(controller.session().has_pending_hint());
        assert_eq!(controller.ticker().pending, Some(Duration::from_millis(600)));

        let mut ticks = 0;
        while controller.ticker().pending.is_some() {
            assert!(controller.tick());
            ticks += 1;
        }

        assert_eq!(ticks, 5);
        assert_eq!(controller.session().moves(), 5);
        assert!(controller.session().is_solved());
        assert!(!controller.session().has_pending_hint());
        assert!(!controller.tick());
    }

    #[test]
    fn manual_move_drops_pending_hint() {
        let mut controller = controller_at(&[11, 7, 6, 10, 9]);
        controller.request_hint();
        assert!(controller.tick());
        let cancels = controller.ticker().cancels;

        let index = controller.session().puzzle().legal_moves().next().unwrap();
        assert!(controller.request_move(index));
        assert!(!controller.session().has_pending_hint());
        assert_eq!(controller.ticker().pending, None);
        assert!(controller.ticker().cancels > cancels);
        assert_eq!(controller.session().moves(), 2);
        assert!(!controller.tick());
        assert_eq!(controller.session().moves(), 2);
    }

    #[test]
    fn hint_is_ignored_once_solved() {
        let mut controller = controller_at(&[14]);
        assert!(controller.request_move(15));
        assert_eq!(controller.request_hint(), 0);
        assert_eq!(controller.ticker().schedules, 0);
    }

    #[test]
    fn short_hint_cap_stops_early() {
        let config = PuzzleConfig {
            hint_len: 2,
            ..seeded()
        };
        let puzzle = [11, 7, 6, 10, 9]
            .iter()
            .fold(Puzzle::new(), |p, &index| p.apply(index));
        let mut controller =
            Controller::with_puzzle(config, ManualTicker::default(), puzzle).unwrap();

        assert_eq!(controller.request_hint(), 2);
        assert!(controller.tick());
        assert!(controller.tick());
        assert_eq!(controller.ticker().pending, None);
        assert!(!controller.session().is_solved());
        assert_eq!(controller.request_hint(), 2);
        assert_eq!(controller.session().moves(), 2);
    }

    #[test]
    fn reset_clears_everything() {
        let mut controller = controller_at(&[11, 7, 6, 10, 9]);
        controller.request_hint();
        controller.tick();
        controller.reset();

        let session = controller.session();
        assert_eq!(session.moves(), 0);
        assert!(!session.has_pending_hint());
        assert_eq!(controller.ticker().pending, None);
        assert!(session.puzzle().is_solvable());
    }

    #[test]
    fn short_scrambles_never_deal_a_solved_board() {
        for seed in 0..40 {
            let config = PuzzleConfig {
                shuffle_steps: 2,
                seed: Some(seed),
                ..Default::default()
            };
            let mut controller = Controller::new(config, ManualTicker::default()).unwrap();
            for _ in 0..3 {
                let session = controller.session();
                assert!(!session.is_solved());
                assert!(!session.puzzle().is_solved());
                assert_eq!(session.moves(), 0);
                assert!(controller.request_hint() > 0);
                controller.reset();
            }
        }
    }

    #[test]
    fn given_board_starts_unsolved_and_ready() {
        let mut controller =
            Controller::with_puzzle(seeded(), ManualTicker::default(), Puzzle::new()).unwrap();
        assert!(!controller.session().is_solved());
        assert_eq!(controller.request_hint(), 0);
        assert_eq!(controller.ticker().pending, None);
    }

    #[test]
    fn given_board_leaves_the_dealer_untouched() {
        let config = PuzzleConfig {
            min_difficulty: Some(6),
            ..seeded()
        };
        let fresh = Controller::new(config.clone(), NoTicker).unwrap();

        let puzzle = [14, 10].iter().fold(Puzzle::new(), |p, &index| p.apply(index));
        let mut given = Controller::with_puzzle(config, NoTicker, puzzle).unwrap();
        assert_eq!(given.session().puzzle(), &puzzle);

        given.reset();
        assert_eq!(given.session().puzzle(), fresh.session().puzzle());
    }

    #[test]
    fn given_board_still_validates_config() {
        let config = PuzzleConfig {
            shuffle_steps: 0,
            ..Default::default()
        };
        assert!(matches!(
            Controller::with_puzzle(config, NoTicker, Puzzle::new()),
            Err(Error::InvalidConfig(_))
        ));
    }
}
