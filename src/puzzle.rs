use crate::error::{BoardError, Error};
use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

pub const SIZE: usize = 4;
pub const CELLS: usize = SIZE * SIZE;

const BLANK: u8 = 0;
const GOAL: [u8; CELLS] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, BLANK];

/// Direction the blank travels when a move is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Up,
    Left,
    Down,
    Right,
}

impl Move {
    /// Order in which every search enumerates neighbours of the blank.
    pub const ALL: [Move; 4] = [Move::Right, Move::Down, Move::Left, Move::Up];

    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Left => (0, -1),
            Move::Down => (1, 0),
            Move::Right => (0, 1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Up => "Up",
            Move::Left => "Left",
            Move::Down => "Down",
            Move::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// A 4x4 arrangement of the labels 1..=15 and a single blank, in row-major order.
///
/// Equality and hashing go through [`Puzzle::key`], so two boards with the same
/// slot contents are the same state.
#[derive(Clone, Copy)]
pub struct Puzzle {
    tiles: [u8; CELLS],
    blank: usize,
}

impl Puzzle {
    /// The solved board: labels in order with the blank in the last slot.
    pub fn new() -> Self {
        Self {
            tiles: GOAL,
            blank: CELLS - 1,
        }
    }

    pub fn tiles(&self) -> &[u8; CELLS] {
        &self.tiles
    }

    pub fn blank(&self) -> usize {
        self.blank
    }

    /// Label at `index`, or `None` for the blank or an out-of-range index.
    pub fn tile(&self, index: usize) -> Option<u8> {
        self.tiles.get(index).copied().filter(|&label| label != BLANK)
    }

    /// Goal `(row, col)` of a label.
    pub fn home_of(label: u8) -> Option<(usize, usize)> {
        (1..=15)
            .contains(&label)
            .then(|| (((label - 1) as usize) / SIZE, ((label - 1) as usize) % SIZE))
    }

    /// Slot the blank would move into, if it stays on the board.
    pub fn neighbor(&self, movement: Move) -> Option<usize> {
        let (dr, dc) = movement.as_offset();
        let row = (self.blank / SIZE) as isize + dr;
        let col = (self.blank % SIZE) as isize + dc;

        if row >= 0 && row < SIZE as isize && col >= 0 && col < SIZE as isize {
            Some(row as usize * SIZE + col as usize)
        } else {
            None
        }
    }

    /// Indices that may legally be activated: the orthogonal neighbours of the blank.
    pub fn legal_moves(&self) -> impl Iterator<Item = usize> + '_ {
        Move::ALL.into_iter().filter_map(|dir| self.neighbor(dir))
    }

    pub fn is_adjacent(&self, index: usize) -> bool {
        if index >= CELLS {
            return false;
        }
        let (row, col) = (index / SIZE, index % SIZE);
        let (blank_row, blank_col) = (self.blank / SIZE, self.blank % SIZE);

        (row == blank_row && col.abs_diff(blank_col) == 1)
            || (col == blank_col && row.abs_diff(blank_row) == 1)
    }

    /// Swaps the blank with `index`, or `None` if that slot is not next to the blank.
    pub fn try_apply(&self, index: usize) -> Option<Self> {
        if !self.is_adjacent(index) {
            return None;
        }
        let mut next = *self;
        next.tiles.swap(self.blank, index);
        next.blank = index;
        Some(next)
    }

    /// Like [`Puzzle::try_apply`], but an illegal index leaves the board unchanged.
    pub fn apply(&self, index: usize) -> Self {
        self.try_apply(index).unwrap_or(*self)
    }

    pub fn successors(&self) -> impl Iterator<Item = Self> + '_ {
        self.legal_moves().map(|index| self.apply(index))
    }

    pub fn is_solved(&self) -> bool {
        self.tiles == GOAL
    }

    /// Canonical key: one nibble per slot, slot 0 in the most significant position.
    pub fn key(&self) -> u64 {
        self.tiles
            .iter()
            .fold(0u64, |key, &label| (key << 4) | u64::from(label))
    }

    /// Parity test for a 4-wide board: solvable iff inversions plus the blank's
    /// row (counted from the top) is odd.
    pub fn is_solvable(&self) -> bool {
        (Self::count_inversions(&self.tiles) + self.blank / SIZE) % 2 == 1
    }

    fn count_inversions(flattened: &[u8]) -> usize {
        flattened
            .iter()
            .enumerate()
            .filter(|&(_, &val)| val != BLANK)
            .map(|(i, &val)| {
                flattened[i + 1..]
                    .iter()
                    .filter(|&&next| next != BLANK && next < val)
                    .count()
            })
            .sum()
    }

    /// Sum over the labelled tiles of the grid distance to their goal slot.
    pub fn manhattan_distance(&self) -> usize {
        self.tiles
            .iter()
            .enumerate()
            .filter_map(|(index, &label)| {
                let (target_row, target_col) = Self::home_of(label)?;
                Some(
                    (index / SIZE).abs_diff(target_row) + (index % SIZE).abs_diff(target_col),
                )
            })
            .sum()
    }
}

impl Default for Puzzle {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Puzzle {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Puzzle {}

impl Hash for Puzzle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl TryFrom<[u8; CELLS]> for Puzzle {
    type Error = Error;

    fn try_from(tiles: [u8; CELLS]) -> Result<Self, Self::Error> {
        let mut seen = [false; CELLS];
        for &label in &tiles {
            if label as usize >= CELLS {
                return Err(BoardError::LabelOutOfRange(label).into());
            }
            if seen[label as usize] {
                return Err(match label {
                    BLANK => BoardError::ExtraBlank,
                    _ => BoardError::DuplicateLabel(label),
                }
                .into());
            }
            seen[label as usize] = true;
        }

        // 16 distinct values below 16 always include the blank
        let blank = tiles.iter().position(|&label| label == BLANK).unwrap_or_default();
        Ok(Self { tiles, blank })
    }
}

impl TryFrom<&[u8]> for Puzzle {
    type Error = Error;

    fn try_from(slots: &[u8]) -> Result<Self, Self::Error> {
        let tiles: [u8; CELLS] = slots
            .try_into()
            .map_err(|_| BoardError::WrongLength(slots.len()))?;
        Self::try_from(tiles)
    }
}

/// Parses 16 slots separated by whitespace or commas; `0`, `_` and `.` mark the blank.
impl FromStr for Puzzle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let slots = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
            .map(|token| match token {
                "_" | "." => Ok(BLANK),
                _ => token
                    .parse::<u8>()
                    .map_err(|_| BoardError::BadToken(token.to_string())),
            })
            .collect::<Result<Vec<u8>, BoardError>>()?;

        Self::try_from(slots.as_slice())
    }
}

impl fmt::Debug for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Puzzle").field(&self.tiles).finish()
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.chunks(SIZE) {
            for &val in row {
                if val == BLANK {
                    write!(f, " . ")?;
                } else {
                    write!(f, "{:2} ", val)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
