use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::piece::{Kind, Piece};
use crate::types::{BOARD_WIDTH, BoardView, CellView, Position};

const NUM_SQUARES: usize = BOARD_WIDTH * BOARD_WIDTH;
const BACK_RANK: [Kind; BOARD_WIDTH] = [
    Kind::Rook,
    Kind::Knight,
    Kind::Bishop,
    Kind::Queen,
    Kind::King,
    Kind::Bishop,
    Kind::Knight,
    Kind::Rook,
];
const EMPTY_SYMBOL: char = '.';

pub type Cells = [[Option<Piece>; BOARD_WIDTH]; BOARD_WIDTH];

/// Wire shape of a snapshot: eight rows of eight `null`-or-symbol strings.
pub type WireRows = Vec<Vec<Option<String>>>;

/// Immutable 8x8 snapshot of piece placement.
///
/// Every change produces a new `Board`; there are no in-place mutators.
/// No chess invariant is enforced: any number of kings, stacked captures and
/// empty-source moves are all representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "WireRows", try_from = "WireRows")]
pub struct Board {
    cells: Cells,
}

impl Board {
    /// Creates the standard starting arrangement:
    /// white (uppercase) on rows 0-1, black (lowercase) on rows 6-7.
    pub fn initial() -> Self {
        let mut cells: Cells = [[None; BOARD_WIDTH]; BOARD_WIDTH];
        for (col, kind) in BACK_RANK.into_iter().enumerate() {
            cells[0][col] = Some(Piece::white(kind));
            cells[1][col] = Some(Piece::white(Kind::Pawn));
            cells[6][col] = Some(Piece::black(Kind::Pawn));
            cells[7][col] = Some(Piece::black(kind));
        }
        Self { cells }
    }

    pub fn empty() -> Self {
        Self {
            cells: [[None; BOARD_WIDTH]; BOARD_WIDTH],
        }
    }

    pub fn from_cells(cells: Cells) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &Cells {
        &self.cells
    }

    /// Returns the piece on `pos`, or `None` for an empty square.
    pub fn get(&self, pos: Position) -> Result<Option<Piece>> {
        let pos = pos.checked()?;
        Ok(self.cells[pos.row as usize][pos.col as usize])
    }

    /// Relocates whatever `from` holds onto `to` and returns the new snapshot.
    ///
    /// Contract:
    /// - `from` becomes empty.
    /// - `to` receives the prior content of `from`, overwriting silently.
    /// - An empty `from` is accepted and clears `to`.
    /// - `from == to` yields a board equal in content to `self`.
    ///
    /// Caller contract: both cells must be on the board.
    pub fn apply_move(&self, from: Position, to: Position) -> Self {
        debug_assert!(from.is_on_board() && to.is_on_board());

        let moving = self.cells[from.row as usize][from.col as usize];
        let mut cells = self.cells;
        cells[from.row as usize][from.col as usize] = None;
        cells[to.row as usize][to.col as usize] = moving;
        Self { cells }
    }

    /// Iterates occupied squares in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells.iter().enumerate().filter_map(move |(col, cell)| {
                cell.map(|piece| (Position::new(row as u8, col as u8), piece))
            })
        })
    }

    /// CRC32 of the 64 cell symbols; equal boards share a fingerprint.
    pub fn fingerprint(&self) -> u32 {
        let mut symbols = [0u8; NUM_SQUARES];
        for (slot, cell) in symbols.iter_mut().zip(self.cells.iter().flatten()) {
            *slot = cell.map_or(EMPTY_SYMBOL, Piece::symbol) as u8;
        }
        crc32fast::hash(&symbols)
    }

    /// Builds the renderer's read-only view, row-major.
    pub fn to_view(&self) -> BoardView {
        let mut cells = Vec::with_capacity(NUM_SQUARES);
        for (row, rank) in self.cells.iter().enumerate() {
            for (col, cell) in rank.iter().enumerate() {
                let pos = Position::new(row as u8, col as u8);
                cells.push(CellView {
                    row: pos.row,
                    col: pos.col,
                    is_dark: pos.is_dark(),
                    piece: cell.map(Piece::symbol),
                    asset: cell.map(Piece::asset),
                });
            }
        }
        BoardView { cells }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (row, rank) in self.cells.iter().enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for (col, cell) in rank.iter().enumerate() {
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", cell.map_or(EMPTY_SYMBOL, Piece::symbol))?;
            }
        }
        Ok(())
    }
}

impl From<Board> for WireRows {
    fn from(board: Board) -> Self {
        board
            .cells
            .iter()
            .map(|rank| {
                rank.iter()
                    .map(|cell| cell.map(|piece| piece.symbol().to_string()))
                    .collect()
            })
            .collect()
    }
}

impl TryFrom<WireRows> for Board {
    type Error = Error;

    fn try_from(rows: WireRows) -> Result<Self> {
        if rows.len() != BOARD_WIDTH {
            return Err(Error::Decode(format!(
                "expected {BOARD_WIDTH} rows, got {}",
                rows.len()
            )));
        }

        let mut cells: Cells = [[None; BOARD_WIDTH]; BOARD_WIDTH];
        for (row, rank) in rows.iter().enumerate() {
            if rank.len() != BOARD_WIDTH {
                return Err(Error::Decode(format!(
                    "row {row}: expected {BOARD_WIDTH} cells, got {}",
                    rank.len()
                )));
            }
            for (col, cell) in rank.iter().enumerate() {
                cells[row][col] = parse_cell(cell.as_deref())
                    .map_err(|reason| Error::Decode(format!("cell ({row}, {col}): {reason}")))?;
            }
        }

        Ok(Self { cells })
    }
}

/// `null` and `""` are both the absence marker.
fn parse_cell(cell: Option<&str>) -> std::result::Result<Option<Piece>, String> {
    let Some(text) = cell.filter(|text| !text.is_empty()) else {
        return Ok(None);
    };

    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Piece::from_symbol(symbol)
            .map(Some)
            .ok_or_else(|| format!("unknown piece symbol {symbol:?}")),
        _ => Err(format!("expected a single piece symbol, got {text:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col)
    }

    fn all_positions() -> impl Iterator<Item = Position> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |col| pos(row, col)))
    }

    fn scattered_board() -> Board {
        let mut cells: Cells = [[None; BOARD_WIDTH]; BOARD_WIDTH];
        cells[0][0] = Some(Piece::white(Kind::King));
        cells[3][5] = Some(Piece::black(Kind::Queen));
        cells[3][6] = Some(Piece::black(Kind::Queen));
        cells[7][7] = Some(Piece::white(Kind::Knight));
        Board::from_cells(cells)
    }

    #[test]
    fn initial_board_places_kings_and_leaves_middle_empty() {
        let board = Board::initial();

        assert_eq!(board.get(pos(0, 4)), Ok(Some(Piece::white(Kind::King))));
        assert_eq!(board.get(pos(7, 4)), Ok(Some(Piece::black(Kind::King))));
        for row in 2..6 {
            for col in 0..8 {
                assert_eq!(board.get(pos(row, col)), Ok(None), "({row}, {col})");
            }
        }
        assert_eq!(board.pieces().count(), 32);
    }

    #[test]
    fn get_rejects_out_of_range_cells() {
        let board = Board::initial();

        assert_eq!(board.get(pos(8, 0)), Err(Error::OutOfRange { row: 8, col: 0 }));
        assert_eq!(board.get(pos(0, 200)), Err(Error::OutOfRange { row: 0, col: 200 }));
    }

    #[test]
    fn pawn_double_step_moves_only_the_pawn() {
        let before = Board::initial();
        let pawn = before.get(pos(6, 4)).unwrap();

        let after = before.apply_move(pos(6, 4), pos(4, 4));

        assert_eq!(after.get(pos(6, 4)), Ok(None));
        assert_eq!(after.get(pos(4, 4)), Ok(pawn));
        assert_eq!(pawn, Some(Piece::black(Kind::Pawn)));
        for cell in all_positions().filter(|&p| p != pos(6, 4) && p != pos(4, 4)) {
            assert_eq!(after.get(cell), before.get(cell));
        }
        assert_eq!(before, Board::initial());
    }

    #[test]
    fn apply_move_properties_hold_for_every_cell_pair() {
        for board in [Board::initial(), scattered_board()] {
            for from in all_positions() {
                for to in all_positions() {
                    let after = board.apply_move(from, to);

                    if from == to {
                        assert_eq!(after, board);
                        continue;
                    }
                    assert_eq!(after.get(from), Ok(None));
                    assert_eq!(after.get(to), board.get(from));
                    for cell in all_positions().filter(|&p| p != from && p != to) {
                        assert_eq!(after.get(cell), board.get(cell));
                    }
                }
            }
        }
    }

    #[test]
    fn capture_overwrites_destination_silently() {
        let board = scattered_board();

        let after = board.apply_move(pos(3, 5), pos(0, 0));

        assert_eq!(after.get(pos(0, 0)), Ok(Some(Piece::black(Kind::Queen))));
        assert_eq!(after.pieces().count(), 3);
    }

    #[test]
    fn empty_source_clears_destination() {
        let board = Board::initial();

        let after = board.apply_move(pos(4, 4), pos(0, 3));

        assert_eq!(after.get(pos(0, 3)), Ok(None));
        assert_eq!(after.get(pos(4, 4)), Ok(None));
        assert_eq!(after.pieces().count(), 31);
    }

    #[test]
    fn display_prints_symbols_and_dots() {
        let text = Board::initial().to_string();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "R N B Q K B N R");
        assert_eq!(lines[1], "P P P P P P P P");
        assert_eq!(lines[4], ". . . . . . . .");
        assert_eq!(lines[7], "r n b q k b n r");
    }

    #[test]
    fn fingerprint_tracks_content() {
        let board = Board::initial();
        let moved = board.apply_move(pos(1, 0), pos(2, 0));

        assert_eq!(board.fingerprint(), Board::initial().fingerprint());
        assert_ne!(board.fingerprint(), moved.fingerprint());
        assert_ne!(Board::empty().fingerprint(), board.fingerprint());
    }

    #[test]
    fn view_lists_all_squares_with_assets() {
        let view = Board::initial().to_view();

        assert_eq!(view.cells.len(), 64);
        let corner = &view.cells[0];
        assert_eq!((corner.row, corner.col, corner.is_dark), (0, 0, false));
        assert_eq!(corner.piece, Some('R'));
        assert_eq!(corner.asset, Some("white-rook.svg"));

        let middle = &view.cells[3 * 8 + 2];
        assert_eq!((middle.row, middle.col, middle.is_dark), (3, 2, true));
        assert_eq!(middle.piece, None);
        assert_eq!(middle.asset, None);

        let black_king = &view.cells[7 * 8 + 4];
        assert_eq!(black_king.asset, Some("black-king.svg"));
    }

    #[test]
    fn wire_rows_reject_wrong_shapes() {
        let mut rows = WireRows::from(Board::initial());
        rows.pop();
        assert!(matches!(Board::try_from(rows), Err(Error::Decode(_))));

        let mut rows = WireRows::from(Board::initial());
        rows[3].push(None);
        let err = Board::try_from(rows).unwrap_err();
        assert!(err.to_string().contains("row 3"), "{err}");
    }

    #[test]
    fn wire_rows_reject_unknown_or_multi_char_symbols() {
        let mut rows = WireRows::from(Board::initial());
        rows[2][2] = Some("X".to_string());
        let err = Board::try_from(rows).unwrap_err();
        assert!(err.to_string().contains("cell (2, 2)"), "{err}");

        let mut rows = WireRows::from(Board::initial());
        rows[5][0] = Some("Kq".to_string());
        assert!(matches!(Board::try_from(rows), Err(Error::Decode(_))));
    }

    #[test]
    fn wire_rows_treat_empty_string_as_absent() {
        let mut rows = WireRows::from(Board::initial());
        rows[0][0] = Some(String::new());

        let board = Board::try_from(rows).unwrap();

        assert_eq!(board.get(pos(0, 0)), Ok(None));
        assert_eq!(board.get(pos(0, 1)), Ok(Some(Piece::white(Kind::Knight))));
    }
}
