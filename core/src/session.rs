use core::mem;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Valid transitions:
/// - NotStarted -> InProgress
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// Waiting for the first reveal, no mines placed yet
    #[default]
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One game from the first reveal to a win or a loss.
///
/// Every mutation happens synchronously inside a single call. Notifications for the presentation layer are queued and
/// drained with [`GameSession::take_events`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    difficulty: Difficulty,
    board: Board,
    state: GameState,
    remaining_flags: isize,
    cells_to_reveal: CellCount,
    timer: Timer,
    detonated: Option<Coord2>,
    seed: u64,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// New game with a random seed.
    pub fn new(difficulty: Difficulty) -> Result<Self> {
        Self::with_seed(difficulty, rand::random())
    }

    /// New game whose mine layout is fully determined by `seed` and the first revealed cell.
    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Result<Self> {
        difficulty.validate()?;
        let board = Board::new(difficulty.width(), difficulty.height())?;
        log::debug!("New {} game, seed: {}", difficulty, seed);
        Ok(Self::from_parts(difficulty, board, seed))
    }

    /// Game on a board whose mines are already in place, the first reveal does not move them.
    pub fn from_board(board: Board) -> Self {
        let difficulty = Difficulty::new_unchecked(board.width(), board.height(), board.mine_count());
        Self::from_parts(difficulty, board, 0)
    }

    fn from_parts(difficulty: Difficulty, board: Board, seed: u64) -> Self {
        Self {
            difficulty,
            remaining_flags: difficulty.mine_count() as isize,
            cells_to_reveal: difficulty.safe_cell_count(),
            board,
            state: GameState::NotStarted,
            timer: Timer::default(),
            detonated: None,
            seed,
            events: Vec::new(),
        }
    }

    /// Discards the current board and starts over with a random seed.
    pub fn new_game(&mut self, difficulty: Difficulty) -> Result<()> {
        self.new_game_with_seed(difficulty, rand::random())
    }

    pub fn new_game_with_seed(&mut self, difficulty: Difficulty, seed: u64) -> Result<()> {
        let fresh = Self::with_seed(difficulty, seed)?;
        self.timer.stop();
        let events = mem::take(&mut self.events);
        *self = Self { events, ..fresh };
        self.events.push(GameEvent::Reset(difficulty));
        Ok(())
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Mines minus flags, negative when more flags than mines were placed.
    pub fn remaining_flags(&self) -> isize {
        self.remaining_flags
    }

    pub fn cells_to_reveal(&self) -> CellCount {
        self.cells_to_reveal
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.timer.elapsed_secs()
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// The mine that ended the game, if it was lost.
    pub fn detonated(&self) -> Option<Coord2> {
        self.detonated
    }

    pub fn view_at(&self, coords: Coord2) -> Result<CellView> {
        self.board
            .get(coords)
            .map(|cell| cell.view(self.is_lost()))
            .ok_or(GameError::InvalidCoords)
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::from_board(&self.board, self.is_lost())
    }

    /// Final results, only available once the game is won or lost.
    pub fn summary(&self) -> Option<GameSummary> {
        self.state.is_finished().then(|| GameSummary {
            difficulty: self.difficulty,
            state: self.state,
            elapsed_secs: self.timer.elapsed_secs(),
            remaining_flags: self.remaining_flags,
            detonated: self.detonated,
            board: self.snapshot(),
        })
    }

    /// Drains the queued notifications, oldest first.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        mem::take(&mut self.events)
    }

    /// One second passed on the outside timer service.
    pub fn tick(&mut self) -> Option<u32> {
        let elapsed = self.timer.tick()?;
        self.events.push(GameEvent::Tick(elapsed));
        Some(elapsed)
    }

    /// Left click: reveal a hidden cell, chord a revealed one, ignore a flagged one.
    ///
    /// The first call places the mines around `coords` and starts the timer.
    pub fn handle_primary_action(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.board.validate_coords(coords)?;

        if self.state.is_finished() {
            return Ok(RevealOutcome::NoChange);
        }

        if self.state.is_ready() {
            self.start(coords)?;
        }

        match self.board[coords].state() {
            CellState::Revealed => self.handle_chord_action(coords),
            CellState::Flagged => Ok(RevealOutcome::NoChange),
            CellState::Hidden => self.reveal_cell(coords),
        }
    }

    /// Right click: toggle the flag on a hidden or flagged cell while the game is in progress.
    pub fn handle_secondary_action(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.board.validate_coords(coords)?;

        if self.state != GameState::InProgress {
            return Ok(MarkOutcome::NoChange);
        }

        let outcome = self.board.toggle_flag(coords)?;
        match outcome {
            MarkOutcome::Flagged => self.remaining_flags -= 1,
            MarkOutcome::Unflagged => self.remaining_flags += 1,
            MarkOutcome::NoChange => return Ok(outcome),
        }
        log::trace!("{:?} at {:?}, flags left: {}", outcome, coords, self.remaining_flags);
        self.events.push(GameEvent::CellsChanged(vec![coords]));
        self.events.push(GameEvent::FlagsChanged(self.remaining_flags));
        Ok(outcome)
    }

    /// Middle click: reveal every hidden neighbor of a revealed number once it has exactly that many flags around it.
    ///
    /// Stops at the first mine uncovered.
    pub fn handle_chord_action(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.board.validate_coords(coords)?;

        if self.state != GameState::InProgress {
            return Ok(RevealOutcome::NoChange);
        }

        let cell = self.board[coords];
        if !cell.is_revealed() || cell.is_mine() || cell.adjacent_mines() == 0 {
            return Ok(RevealOutcome::NoChange);
        }

        let flagged = self.board.count_flagged_neighbors(coords);
        if flagged != cell.adjacent_mines() {
            log::trace!(
                "Chord at {:?} ignored, {} flags for {} mines",
                coords,
                flagged,
                cell.adjacent_mines()
            );
            return Ok(RevealOutcome::NoChange);
        }

        let neighbors: SmallVec<[Coord2; 8]> = self.board.iter_neighbors(coords).collect();
        let mut outcome = RevealOutcome::NoChange;
        for neighbor in neighbors {
            if !self.board[neighbor].is_hidden() {
                continue;
            }
            outcome = outcome | self.reveal_cell(neighbor)?;
            if self.state.is_finished() {
                break;
            }
        }
        Ok(outcome)
    }

    fn start(&mut self, coords: Coord2) -> Result<()> {
        if !self.board.mines_placed() {
            let mut rng = SmallRng::seed_from_u64(self.seed);
            self.board
                .place_mines(self.difficulty.mine_count(), coords, &mut rng)?;
            self.board.compute_adjacency_counts();
        }

        self.state = GameState::InProgress;
        self.timer.start();
        self.events.push(GameEvent::StateChanged(self.state));
        log::debug!("Game started at {:?}", coords);
        Ok(())
    }

    fn reveal_cell(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let revealed = self.board.reveal(coords)?;
        if revealed.is_empty() {
            return Ok(RevealOutcome::NoChange);
        }

        if self.board[coords].is_mine() {
            self.lose(coords);
            return Ok(RevealOutcome::HitMine);
        }

        self.cells_to_reveal = self
            .cells_to_reveal
            .saturating_sub(revealed.len() as CellCount);
        log::trace!(
            "Revealed {} cells from {:?}, {} left",
            revealed.len(),
            coords,
            self.cells_to_reveal
        );
        self.events.push(GameEvent::CellsChanged(revealed));

        if self.cells_to_reveal == 0 {
            self.win();
            Ok(RevealOutcome::Won)
        } else {
            Ok(RevealOutcome::Revealed)
        }
    }

    fn is_lost(&self) -> bool {
        matches!(self.state, GameState::Lost)
    }

    /// Exposes every mine and wrong flag.
    fn lose(&mut self, detonated: Coord2) {
        self.detonated = Some(detonated);
        self.state = GameState::Lost;
        self.timer.stop();

        let exposed: Vec<Coord2> = self
            .board
            .iter()
            .filter(|cell| cell.is_mine() || cell.is_flagged())
            .map(Cell::coords)
            .collect();
        log::debug!(
            "Game lost at {:?} after {}s",
            detonated,
            self.timer.elapsed_secs()
        );
        self.events.push(GameEvent::CellsChanged(exposed));
        self.finish();
    }

    /// Flags every remaining mine.
    fn win(&mut self) {
        self.state = GameState::Won;
        self.timer.stop();

        let flagged = self.board.flag_remaining_mines();
        log::debug!(
            "Game won after {}s with {} flags",
            self.timer.elapsed_secs(),
            self.board.flagged_count()
        );
        if !flagged.is_empty() {
            self.remaining_flags -= flagged.len() as isize;
            self.events.push(GameEvent::CellsChanged(flagged));
            self.events.push(GameEvent::FlagsChanged(self.remaining_flags));
        }
        self.finish();
    }

    fn finish(&mut self) {
        self.events.push(GameEvent::StateChanged(self.state));
        if let Some(summary) = self.summary() {
            self.events.push(GameEvent::Finished(summary));
        }
    }
}
