use serde::{Deserialize, Serialize};

use crate::*;

/// Player-facing state of a single cell. `Revealed` is terminal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Flagged,
    Revealed,
}

/// What a presentation layer should draw for a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Revealed(u8),
    /// Unflagged mine exposed after a loss
    Mine,
    /// Correctly flagged mine exposed after a loss
    FlaggedMine,
    /// Flag placed on a cell without a mine, exposed after a loss
    IncorrectFlag,
    /// The mine that ended the game
    Detonated,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    row: Coord,
    col: Coord,
    is_mine: bool,
    state: CellState,
    adjacent_mines: u8,
}

impl Cell {
    pub const fn new((row, col): Coord2) -> Self {
        Self {
            row,
            col,
            is_mine: false,
            state: CellState::Hidden,
            adjacent_mines: 0,
        }
    }

    pub const fn coords(&self) -> Coord2 {
        (self.row, self.col)
    }

    pub const fn is_mine(&self) -> bool {
        self.is_mine
    }

    pub const fn state(&self) -> CellState {
        self.state
    }

    pub const fn is_hidden(&self) -> bool {
        matches!(self.state, CellState::Hidden)
    }

    pub const fn is_flagged(&self) -> bool {
        matches!(self.state, CellState::Flagged)
    }

    pub const fn is_revealed(&self) -> bool {
        matches!(self.state, CellState::Revealed)
    }

    /// Number of mines among the neighbors, only meaningful when the cell is not a mine.
    pub const fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }

    pub(crate) fn set_mine(&mut self) {
        self.is_mine = true;
        self.adjacent_mines = 0;
    }

    pub(crate) fn set_adjacent_mines(&mut self, count: u8) {
        self.adjacent_mines = count;
    }

    /// Hidden -> Flagged, anything else is left alone.
    pub(crate) fn flag(&mut self) -> bool {
        if self.is_hidden() {
            self.state = CellState::Flagged;
            true
        } else {
            false
        }
    }

    /// Flagged -> Hidden, anything else is left alone.
    pub(crate) fn unflag(&mut self) -> bool {
        if self.is_flagged() {
            self.state = CellState::Hidden;
            true
        } else {
            false
        }
    }

    pub(crate) fn toggle_flag(&mut self) -> MarkOutcome {
        if self.flag() {
            MarkOutcome::Flagged
        } else if self.unflag() {
            MarkOutcome::Unflagged
        } else {
            MarkOutcome::NoChange
        }
    }

    /// Hidden -> Revealed. Flagged and revealed cells ignore the request.
    pub(crate) fn reveal(&mut self) -> bool {
        if self.is_hidden() {
            self.state = CellState::Revealed;
            true
        } else {
            false
        }
    }

    /// Visual state of the cell, `lost` exposes mines and wrong flags.
    pub fn view(&self, lost: bool) -> CellView {
        use CellState::*;
        match (self.state, self.is_mine, lost) {
            (Revealed, false, _) => CellView::Revealed(self.adjacent_mines),
            (Revealed, true, _) => CellView::Detonated,
            (Flagged, true, true) => CellView::FlaggedMine,
            (Flagged, false, true) => CellView::IncorrectFlag,
            (Flagged, _, false) => CellView::Flagged,
            (Hidden, true, true) => CellView::Mine,
            (Hidden, _, _) => CellView::Hidden,
        }
    }
}
