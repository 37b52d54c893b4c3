use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("expected 16 slots, found {0}")]
    WrongLength(usize),
    #[error("label {0} is out of range 1..=15")]
    LabelOutOfRange(u8),
    #[error("label {0} appears more than once")]
    DuplicateLabel(u8),
    #[error("board has more than one blank slot")]
    ExtraBlank,
    #[error("could not parse slot {0:?}")]
    BadToken(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid board: {0}")]
    InvalidBoard(#[from] BoardError),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
