use log::{debug, warn};

use crate::board::Board;
use crate::error::Result;
use crate::gesture::DragTracker;
use crate::sync::{ConnectionState, SyncChannel, Transport};
use crate::types::{Move, Position};

/// Sole owner of the current board.
///
/// Local gestures and inbound peer messages both go through here, one at a
/// time, so the board has a single writer. Every accepted event replaces the
/// board with a new snapshot; nothing is mutated in place and no history is
/// kept.
pub struct Session<T> {
    board: Board,
    sync: SyncChannel<T>,
    drag: DragTracker,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T) -> Self {
        Self::with_board(Board::initial(), transport)
    }

    pub fn with_board(board: Board, transport: T) -> Self {
        Self {
            board,
            sync: SyncChannel::new(transport),
            drag: DragTracker::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn sync(&self) -> &SyncChannel<T> {
        &self.sync
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.sync.state()
    }

    pub fn on_open(&mut self) {
        self.sync.on_open();
    }

    pub fn on_close(&mut self) {
        self.sync.on_close();
        self.drag.cancel();
    }

    /// Applies a local relocation, installs it, and sends it to the peer.
    pub fn move_piece(&mut self, from: Position, to: Position) -> Result<&Board> {
        self.apply_move(Move::new(from, to))
    }

    pub fn apply_move(&mut self, mv: Move) -> Result<&Board> {
        let mv = mv.checked()?;
        let moving = self.board.get(mv.from)?;
        debug!(
            "{} ({}, {}) -> ({}, {})",
            moving.map_or_else(|| "nothing".to_string(), |piece| piece.to_string()),
            mv.from.row,
            mv.from.col,
            mv.to.row,
            mv.to.col
        );
        let next = self.board.apply_move(mv.from, mv.to);
        self.install_local(next);
        Ok(&self.board)
    }

    /// Applies a `"fr fc tr tc"` text command.
    pub fn apply_text_move(&mut self, command: &str) -> Result<&Board> {
        let mv: Move = command.parse()?;
        self.apply_move(mv)
    }

    pub fn drag_start(&mut self, from: Position) -> Result<()> {
        self.drag.start(from.checked()?);
        Ok(())
    }

    /// Completes a drag. `Ok(None)` when the drop is not a piece move.
    pub fn drop_piece(&mut self, kind: &str, to: Position) -> Result<Option<&Board>> {
        let to = to.checked()?;
        match self.drag.drop_on(kind, to) {
            Some(mv) => self.apply_move(mv).map(Some),
            None => Ok(None),
        }
    }

    /// Installs an inbound snapshot, replacing whatever is current.
    ///
    /// A message that does not decode is discarded and the current board is
    /// left untouched; `None` is returned.
    pub fn receive_message(&mut self, text: &str) -> Option<&Board> {
        match self.sync.receive(text) {
            Ok(board) => {
                self.board = board;
                Some(&self.board)
            }
            Err(err) => {
                warn!("discarding inbound message: {err}");
                None
            }
        }
    }

    fn install_local(&mut self, board: Board) {
        self.board = board;
        self.sync.publish(&self.board);
    }
}
