use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Notification queued by a [`GameSession`] for the presentation layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new game replaced the previous one, every cell should be redrawn
    Reset(Difficulty),
    /// The views of these cells changed
    CellsChanged(Vec<Coord2>),
    /// New remaining flag budget
    FlagsChanged(isize),
    /// New elapsed time in seconds
    Tick(u32),
    StateChanged(GameState),
    /// The game reached a final state
    Finished(GameSummary),
}

/// Visual state of every cell at one point in time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    views: Array2<CellView>,
}

impl BoardSnapshot {
    pub fn from_board(board: &Board, lost: bool) -> Self {
        let (rows, cols) = board.size();
        let views = Array2::from_shape_fn((usize::from(rows), usize::from(cols)), |(row, col)| {
            board[(row as Coord, col as Coord)].view(lost)
        });
        Self { views }
    }

    /// `(rows, cols)`
    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.views.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn view_at(&self, coords: Coord2) -> Option<CellView> {
        self.views.get(coords.to_nd_index()).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = CellView> + '_> + '_ {
        self.views.rows().into_iter().map(|row| row.into_iter().copied())
    }

    pub fn count(&self, view: CellView) -> usize {
        self.views.iter().filter(|&&v| v == view).count()
    }
}

/// Results of a finished game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub difficulty: Difficulty,
    pub state: GameState,
    pub elapsed_secs: u32,
    pub remaining_flags: isize,
    pub detonated: Option<Coord2>,
    pub board: BoardSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_cell_views() {
        let mut board = Board::from_mine_coords(3, 2, &[(0, 0)]).unwrap();
        board.reveal((1, 2)).unwrap();
        board.toggle_flag((0, 0)).unwrap();

        let snapshot = BoardSnapshot::from_board(&board, false);

        assert_eq!(snapshot.size(), (2, 3));
        assert_eq!(snapshot.view_at((0, 0)), Some(CellView::Flagged));
        assert_eq!(snapshot.view_at((1, 2)), Some(CellView::Revealed(0)));
        assert_eq!(snapshot.view_at((2, 0)), None);
        assert_eq!(snapshot.count(CellView::Hidden), 1);

        let rows: Vec<Vec<CellView>> = snapshot.rows().map(|row| row.collect()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][1], CellView::Revealed(1));
    }

    #[test]
    fn lost_snapshot_exposes_mines() {
        let board = Board::from_mine_coords(2, 2, &[(1, 1)]).unwrap();

        let snapshot = BoardSnapshot::from_board(&board, true);

        assert_eq!(snapshot.view_at((1, 1)), Some(CellView::Mine));
        assert_eq!(snapshot.count(CellView::Hidden), 3);
    }
}
