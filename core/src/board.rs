use core::ops::Index;
use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Rejection sampling gives up after this many draws per cell on the board.
const PLACEMENT_ATTEMPTS_PER_CELL: u32 = 256;

/// Rectangular grid of cells, indexed by `(row, col)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
    mines_placed: bool,
}

impl Board {
    /// Empty board with every cell hidden and no mines.
    pub fn new(width: Coord, height: Coord) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GameError::InvalidSize);
        }

        let cells = Array2::from_shape_fn((usize::from(height), usize::from(width)), |(row, col)| {
            Cell::new((row as Coord, col as Coord))
        });

        Ok(Self {
            cells,
            mine_count: 0,
            mines_placed: false,
        })
    }

    /// Board with a fixed mine layout and adjacency counts already computed.
    pub fn from_mine_coords(width: Coord, height: Coord, mine_coords: &[Coord2]) -> Result<Self> {
        let mut board = Self::new(width, height)?;

        for &coords in mine_coords {
            let coords = board.validate_coords(coords)?;
            if !board[coords].is_mine() {
                board.cell_mut(coords).set_mine();
                board.mine_count += 1;
            }
        }

        board.mines_placed = true;
        board.compute_adjacency_counts();
        Ok(board)
    }

    /// `(rows, cols)`
    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn width(&self) -> Coord {
        self.size().1
    }

    pub fn height(&self) -> Coord {
        self.size().0
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len() as CellCount
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (rows, cols) = self.size();
        if coords.0 < rows && coords.1 < cols {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn get(&self, coords: Coord2) -> Option<&Cell> {
        self.cells.get(coords.to_nd_index())
    }

    /// Row-major iteration over every cell.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    /// In-bounds neighbors of `coords`: 3 at a corner, 5 on an edge, 8 inside.
    pub fn neighbors_of(&self, coords: Coord2) -> Result<SmallVec<[Coord2; 8]>> {
        let coords = self.validate_coords(coords)?;
        Ok(self.iter_neighbors(coords).collect())
    }

    pub fn count_adjacent_mines(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos].is_mine())
            .count() as u8
    }

    pub fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos].is_flagged())
            .count() as u8
    }

    pub fn flagged_count(&self) -> CellCount {
        self.cells.iter().filter(|cell| cell.is_flagged()).count() as CellCount
    }

    pub fn revealed_count(&self) -> CellCount {
        self.cells.iter().filter(|cell| cell.is_revealed()).count() as CellCount
    }

    /// Number of cells outside the 3x3 block around `safe`, clamped at the edges.
    pub fn eligible_mine_cells(&self, safe: Coord2) -> CellCount {
        self.total_cells() - (self.iter_neighbors(safe).count() as CellCount + 1)
    }

    /// Places `mine_count` mines uniformly at random, never within Chebyshev distance 1 of `safe`.
    ///
    /// Cells are drawn uniformly and rejected when already mined or inside the safe block. The board is only modified
    /// when every mine could be placed.
    pub fn place_mines<R: Rng>(
        &mut self,
        mine_count: CellCount,
        safe: Coord2,
        rng: &mut R,
    ) -> Result<()> {
        let safe = self.validate_coords(safe)?;

        if self.mines_placed {
            return Err(GameError::MinesAlreadyPlaced);
        }

        let eligible = self.eligible_mine_cells(safe);
        if mine_count > eligible {
            log::warn!(
                "Cannot keep {:?} safe, requested {} mines but only {} cells are eligible",
                safe,
                mine_count,
                eligible
            );
            return Err(GameError::TooManyMines {
                mines: mine_count,
                max: eligible,
            });
        }

        let (rows, cols) = self.size();
        let max_attempts = u32::from(self.total_cells()).saturating_mul(PLACEMENT_ATTEMPTS_PER_CELL);
        let mut mines: Array2<bool> = Array2::default(self.cells.dim());
        let mut placed: CellCount = 0;
        let mut attempts: u32 = 0;

        while placed < mine_count {
            if attempts >= max_attempts {
                log::warn!(
                    "Mine placement exhausted after {} attempts, {} of {} placed",
                    attempts,
                    placed,
                    mine_count
                );
                return Err(GameError::PlacementExhausted { attempts });
            }
            attempts += 1;

            let coords = (rng.random_range(0..rows), rng.random_range(0..cols));
            if mines[coords.to_nd_index()] || is_adjacent_or_same(coords, safe) {
                continue;
            }
            mines[coords.to_nd_index()] = true;
            placed += 1;
        }

        for (cell, &is_mine) in self.cells.iter_mut().zip(mines.iter()) {
            if is_mine {
                cell.set_mine();
            }
        }
        self.mine_count = mine_count;
        self.mines_placed = true;
        log::debug!(
            "Placed {} mines around safe cell {:?} in {} attempts",
            mine_count,
            safe,
            attempts
        );
        Ok(())
    }

    /// Stores the number of mine neighbors on every non-mine cell. Safe to call again.
    pub fn compute_adjacency_counts(&mut self) {
        let (rows, cols) = self.size();
        for row in 0..rows {
            for col in 0..cols {
                let coords = (row, col);
                if self[coords].is_mine() {
                    continue;
                }
                let count = self.count_adjacent_mines(coords);
                self.cell_mut(coords).set_adjacent_mines(count);
            }
        }
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.validate_coords(coords)?;
        Ok(self.cell_mut(coords).toggle_flag())
    }

    /// Reveals a hidden cell and, when it has no adjacent mines, flood reveals the surrounding region.
    ///
    /// Returns every coordinate that changed to revealed, starting with `coords`. A hidden mine is revealed on its own
    /// and handling the loss is up to the caller. Flagged cells are never revealed and the flood does not pass
    /// through them.
    pub fn reveal(&mut self, coords: Coord2) -> Result<Vec<Coord2>> {
        let coords = self.validate_coords(coords)?;
        let mut revealed = Vec::new();

        if !self.cell_mut(coords).reveal() {
            return Ok(revealed);
        }
        revealed.push(coords);

        let cell = self[coords];
        if cell.is_mine() || cell.adjacent_mines() != 0 {
            return Ok(revealed);
        }

        let mut to_visit: Vec<Coord2> = self.hidden_safe_neighbors(coords).collect();
        log::trace!(
            "Starting flood reveal from {:?}, initial neighbors: {:?}",
            coords,
            to_visit
        );

        while let Some(visit_coords) = to_visit.pop() {
            // queued twice when shared by two zero cells
            if !self.cell_mut(visit_coords).reveal() {
                continue;
            }
            revealed.push(visit_coords);

            let visit_count = self[visit_coords].adjacent_mines();
            log::trace!(
                "Flood revealed cell at {:?}, mine count: {}",
                visit_coords,
                visit_count
            );

            if visit_count == 0 {
                to_visit.extend(self.hidden_safe_neighbors(visit_coords));
            }
        }

        Ok(revealed)
    }

    /// Flags every mine that is still hidden, returning the cells that changed.
    pub(crate) fn flag_remaining_mines(&mut self) -> Vec<Coord2> {
        self.cells
            .iter_mut()
            .filter(|cell| cell.is_mine() && cell.is_hidden())
            .map(|cell| {
                cell.flag();
                cell.coords()
            })
            .collect()
    }

    /// Coordinates of every mine, row-major.
    pub fn mine_coords(&self) -> Vec<Coord2> {
        self.cells
            .iter()
            .filter(|cell| cell.is_mine())
            .map(Cell::coords)
            .collect()
    }

    fn hidden_safe_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + '_ {
        self.iter_neighbors(coords).filter(|&pos| {
            let cell = &self[pos];
            cell.is_hidden() && !cell.is_mine()
        })
    }

    fn cell_mut(&mut self, coords: Coord2) -> &mut Cell {
        &mut self.cells[coords.to_nd_index()]
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}
