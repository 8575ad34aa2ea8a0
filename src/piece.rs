use serde::Serialize;

use crate::error::{Error, Result};

/// Owner of a piece. Uppercase symbols are white, lowercase are black.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Kind {
    fn letter(self) -> char {
        match self {
            Kind::Pawn => 'P',
            Kind::Knight => 'N',
            Kind::Bishop => 'B',
            Kind::Rook => 'R',
            Kind::Queen => 'Q',
            Kind::King => 'K',
        }
    }

    fn name(self) -> &'static str {
        match self {
            Kind::Pawn => "pawn",
            Kind::Knight => "knight",
            Kind::Bishop => "bishop",
            Kind::Rook => "rook",
            Kind::Queen => "queen",
            Kind::King => "king",
        }
    }
}

/// One of the twelve piece symbols.
///
/// Serializes as its single-character symbol (`"K"`, `"p"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "char")]
pub struct Piece {
    pub side: Side,
    pub kind: Kind,
}

impl Piece {
    pub const fn new(side: Side, kind: Kind) -> Self {
        Self { side, kind }
    }

    pub const fn white(kind: Kind) -> Self {
        Self::new(Side::White, kind)
    }

    pub const fn black(kind: Kind) -> Self {
        Self::new(Side::Black, kind)
    }

    /// Returns the board symbol: the kind letter, lowercased for black.
    pub fn symbol(self) -> char {
        let letter = self.kind.letter();
        match self.side {
            Side::White => letter,
            Side::Black => letter.to_ascii_lowercase(),
        }
    }

    /// Parses a board symbol. Returns `None` for anything outside the alphabet.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        let side = if symbol.is_ascii_uppercase() {
            Side::White
        } else {
            Side::Black
        };
        let kind = match symbol.to_ascii_uppercase() {
            'P' => Kind::Pawn,
            'N' => Kind::Knight,
            'B' => Kind::Bishop,
            'R' => Kind::Rook,
            'Q' => Kind::Queen,
            'K' => Kind::King,
            _ => return None,
        };
        Some(Self::new(side, kind))
    }

    /// Image asset drawn for this piece, e.g. `white-rook.svg`.
    pub fn asset(self) -> &'static str {
        ASSETS[self.asset_index()]
    }

    fn asset_index(self) -> usize {
        let side = match self.side {
            Side::White => 0,
            Side::Black => 6,
        };
        side + self.kind as usize
    }
}

const ASSETS: [&str; 12] = [
    "white-pawn.svg",
    "white-knight.svg",
    "white-bishop.svg",
    "white-rook.svg",
    "white-queen.svg",
    "white-king.svg",
    "black-pawn.svg",
    "black-knight.svg",
    "black-bishop.svg",
    "black-rook.svg",
    "black-queen.svg",
    "black-king.svg",
];

impl From<Piece> for char {
    fn from(piece: Piece) -> Self {
        piece.symbol()
    }
}

impl TryFrom<char> for Piece {
    type Error = Error;

    fn try_from(symbol: char) -> Result<Self> {
        Piece::from_symbol(symbol)
            .ok_or_else(|| Error::Decode(format!("unknown piece symbol {symbol:?}")))
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", side_name(self.side), self.kind.name())
    }
}

fn side_name(side: Side) -> &'static str {
    match side {
        Side::White => "white",
        Side::Black => "black",
    }
}
