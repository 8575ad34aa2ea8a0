use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;

pub const BOARD_WIDTH: usize = 8;

/// A board coordinate.
///
/// Construction is unchecked; accessors that take a `Position` validate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    pub fn is_on_board(self) -> bool {
        (self.row as usize) < BOARD_WIDTH && (self.col as usize) < BOARD_WIDTH
    }

    /// Returns `self` when both coordinates are in `0..8`.
    pub fn checked(self) -> Result<Self, Error> {
        if self.is_on_board() {
            Ok(self)
        } else {
            Err(Error::out_of_range(self.row, self.col))
        }
    }

    /// Squares alternate colours; `(0, 0)` is light.
    pub fn is_dark(self) -> bool {
        (u16::from(self.row) + u16::from(self.col)) % 2 == 1
    }
}

/// A relocation request: whatever is on `from` goes to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub const fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }

    pub fn checked(self) -> Result<Self, Error> {
        Ok(Self::new(self.from.checked()?, self.to.checked()?))
    }
}

/// Parses `"from_row from_col to_row to_col"`, e.g. `"6 4 4 4"`.
impl FromStr for Move {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| Error::InvalidMove {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let values = input
            .split_whitespace()
            .map(|token| token.parse::<i64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid("expected four integers"))?;

        let &[from_row, from_col, to_row, to_col] = values.as_slice() else {
            return Err(invalid("expected four integers"));
        };

        let from = coordinate(from_row, from_col)?;
        let to = coordinate(to_row, to_col)?;
        Ok(Self::new(from, to))
    }
}

fn coordinate(row: i64, col: i64) -> Result<Position, Error> {
    let in_range = |v: i64| (0..BOARD_WIDTH as i64).contains(&v);
    if in_range(row) && in_range(col) {
        Ok(Position::new(row as u8, col as u8))
    } else {
        Err(Error::out_of_range(row, col))
    }
}

/// One square as the renderer draws it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellView {
    pub row: u8,
    pub col: u8,
    pub is_dark: bool,
    /// Contract:
    /// - `Some(symbol)` for an occupied square.
    /// - `None` for an empty square; `asset` is then `None` too.
    pub piece: Option<char>,
    pub asset: Option<&'static str>,
}

/// Read-only snapshot handed to the renderer for one draw cycle.
/// Cells are in row-major order, 64 entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    pub cells: Vec<CellView>,
}
