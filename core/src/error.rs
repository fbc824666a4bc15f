use thiserror::Error;

use crate::CellCount;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Invalid board size")]
    InvalidSize,
    #[error("Too many mines: requested {mines}, at most {max} fit")]
    TooManyMines { mines: CellCount, max: CellCount },
    #[error("Unknown difficulty preset: {0:?}")]
    UnknownPreset(String),
    #[error("Mines were already placed on this board")]
    MinesAlreadyPlaced,
    #[error("Gave up placing mines after {attempts} attempts")]
    PlacementExhausted { attempts: u32 },
}

pub type Result<T> = core::result::Result<T, GameError>;
