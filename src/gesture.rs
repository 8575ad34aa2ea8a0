use crate::types::{Move, Position};

/// Payload kind carried by a piece drag. Drop targets only accept this kind.
pub const PIECE_DRAG_KIND: &str = "PIECE";

/// Turns drag-start / drop notifications into moves.
///
/// Knows nothing about what is on the board: a drag may start on any cell,
/// and the board may change (inbound snapshot) before the drop lands.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DragTracker {
    pending: Option<Position>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a drag from `from`, replacing any drag still pending.
    pub fn start(&mut self, from: Position) {
        self.pending = Some(from);
    }

    pub fn pending(&self) -> Option<Position> {
        self.pending
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Completes the pending drag on `to`.
    ///
    /// Contract:
    /// - Returns `None` and keeps nothing pending when no drag was started.
    /// - Returns `None` for a payload kind other than [`PIECE_DRAG_KIND`];
    ///   the drag stays pending so it can still land on an accepting target.
    pub fn drop_on(&mut self, kind: &str, to: Position) -> Option<Move> {
        if kind != PIECE_DRAG_KIND {
            return None;
        }
        let from = self.pending.take()?;
        Some(Move::new(from, to))
    }
}
