//! Binary cell state.

use serde::{Deserialize, Serialize};

/// The state of a single grid cell.
///
/// Serializes as its numeric value (`0` / `1`) through [`From<Cell> for u8`]
/// so renderers can consume grids as plain integer matrices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Cell {
    /// An empty cell.
    #[default]
    Dead = 0,
    /// A live cell.
    Alive = 1,
}

impl Cell {
    /// Whether the cell is alive.
    pub const fn is_alive(self) -> bool {
        matches!(self, Self::Alive)
    }

    /// The opposite state.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dead => Self::Alive,
            Self::Alive => Self::Dead,
        }
    }
}

impl From<bool> for Cell {
    fn from(alive: bool) -> Self {
        if alive { Self::Alive } else { Self::Dead }
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Dead => 0,
            Cell::Alive => 1,
        }
    }
}

impl TryFrom<u8> for Cell {
    type Error = u8;

    /// Accepts only `0` and `1`; any other value is handed back as the error.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Dead),
            1 => Ok(Self::Alive),
            other => Err(other),
        }
    }
}
