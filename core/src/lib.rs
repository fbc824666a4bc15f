use core::fmt;
use core::ops::BitOr;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use event::*;
pub use session::*;
pub use timer::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod event;
mod session;
mod timer;
mod types;

/// Cells around the first reveal that are kept free of mines.
pub const SAFE_ZONE_CELLS: CellCount = 9;

/// Board dimensions and mine count of a game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty {
    width: Coord,
    height: Coord,
    mines: CellCount,
}

impl Difficulty {
    pub const EASY: Self = Self::new_unchecked(9, 9, 10);
    pub const MEDIUM: Self = Self::new_unchecked(16, 16, 40);
    pub const HARD: Self = Self::new_unchecked(30, 16, 99);
    pub const DENSE: Self = Self::new_unchecked(20, 20, 120);
    pub const ENDLESS: Self = Self::new_unchecked(100, 100, 1500);

    pub const PRESETS: [(&'static str, Self); 5] = [
        ("easy", Self::EASY),
        ("medium", Self::MEDIUM),
        ("hard", Self::HARD),
        ("dense", Self::DENSE),
        ("endless", Self::ENDLESS),
    ];

    pub(crate) const fn new_unchecked(width: Coord, height: Coord, mines: CellCount) -> Self {
        Self {
            width,
            height,
            mines,
        }
    }

    pub fn new(width: Coord, height: Coord, mines: CellCount) -> Result<Self> {
        let difficulty = Self::new_unchecked(width, height, mines);
        difficulty.validate()?;
        Ok(difficulty)
    }

    /// Checks that the board is not empty and that the mines leave room for the safe first reveal.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GameError::InvalidSize);
        }

        let total_cells = self.total_cells();
        if total_cells <= SAFE_ZONE_CELLS || self.mines >= total_cells - SAFE_ZONE_CELLS {
            log::warn!(
                "Rejected difficulty {}x{} with {} mines",
                self.width,
                self.height,
                self.mines
            );
            return Err(GameError::TooManyMines {
                mines: self.mines,
                max: total_cells.saturating_sub(SAFE_ZONE_CELLS + 1),
            });
        }

        Ok(())
    }

    pub const fn width(&self) -> Coord {
        self.width
    }

    pub const fn height(&self) -> Coord {
        self.height
    }

    pub const fn mine_count(&self) -> CellCount {
        self.mines
    }

    pub const fn total_cells(&self) -> CellCount {
        cell_count(self.width, self.height)
    }

    pub const fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mines
    }

    /// Name of the matching preset, if any.
    pub fn preset_name(&self) -> Option<&'static str> {
        Self::PRESETS
            .iter()
            .find(|(_, preset)| preset == self)
            .map(|(name, _)| *name)
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::EASY
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        Self::PRESETS
            .iter()
            .find(|(preset_name, _)| *preset_name == name)
            .map(|(_, preset)| *preset)
            .ok_or_else(|| GameError::UnknownPreset(s.to_string()))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.preset_name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}x{} ({} mines)", self.width, self.height, self.mines),
        }
    }
}

/// Outcome of toggling a flag
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Flagged,
    Unflagged,
}

impl MarkOutcome {
    /// Whether a flag was placed or removed
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// What a primary or chord action did to the board
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Nothing was opened: the cell was flagged, already open, or the game is over
    NoChange,
    /// Safe cells were opened and the game goes on
    Revealed,
    /// A mine was opened and the game is lost
    HitMine,
    /// The last safe cell was opened
    Won,
}

impl RevealOutcome {
    /// Whether the board changed
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    const fn severity(self) -> u8 {
        match self {
            Self::NoChange => 0,
            Self::Revealed => 1,
            Self::Won => 2,
            Self::HitMine => 3,
        }
    }
}

/// Combines the reveals of one chord; a detonation outranks a win, which outranks plain reveals.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        if rhs.severity() > self.severity() {
            rhs
        } else {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_satisfy_safe_zone_invariant() {
        for (name, preset) in Difficulty::PRESETS {
            assert_eq!(preset.validate(), Ok(()), "{}", name);
            assert!(preset.mine_count() < preset.total_cells() - SAFE_ZONE_CELLS);
        }
        assert_eq!(Difficulty::ENDLESS.total_cells(), 10_000);
        assert_eq!(Difficulty::HARD.width(), 30);
        assert_eq!(Difficulty::HARD.height(), 16);
    }

    #[test]
    fn new_rejects_mines_that_crowd_out_the_safe_zone() {
        assert_eq!(
            Difficulty::new(9, 9, 72),
            Err(GameError::TooManyMines { mines: 72, max: 71 })
        );
        assert!(Difficulty::new(9, 9, 71).is_ok());
        assert!(Difficulty::new(3, 3, 0).is_err());
        assert_eq!(Difficulty::new(0, 9, 1), Err(GameError::InvalidSize));
    }

    #[test]
    fn presets_parse_by_name() {
        assert_eq!("easy".parse::<Difficulty>(), Ok(Difficulty::EASY));
        assert_eq!(" Endless ".parse::<Difficulty>(), Ok(Difficulty::ENDLESS));
        assert_eq!(
            "expert".parse::<Difficulty>(),
            Err(GameError::UnknownPreset("expert".to_string()))
        );
    }

    #[test]
    fn display_uses_preset_name() {
        assert_eq!(Difficulty::DENSE.to_string(), "dense");
        assert_eq!(
            Difficulty::new(10, 5, 3).unwrap().to_string(),
            "10x5 (3 mines)"
        );
    }

    #[test]
    fn reveal_outcomes_merge_by_priority() {
        use RevealOutcome::*;
        assert_eq!(NoChange | Revealed, Revealed);
        assert_eq!(Revealed | Won, Won);
        assert_eq!(Won | HitMine, HitMine);
        assert_eq!(HitMine | Revealed, HitMine);
        assert_eq!(NoChange | NoChange, NoChange);
        assert!(!NoChange.has_update());
        assert!(MarkOutcome::Unflagged.has_update());
    }
}
