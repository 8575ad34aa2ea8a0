//! Text wire format: one message is one complete snapshot encoded as JSON,
//! an 8-element array of 8-element arrays of `"K"`-style symbols or `null`.
//!
//! There is no version field and no delta encoding; every message stands on
//! its own.

use crate::board::Board;
use crate::error::{Error, Result};

pub fn encode(board: &Board) -> Result<String> {
    serde_json::to_string(board).map_err(|err| Error::Encode(err.to_string()))
}

pub fn decode(text: &str) -> Result<Board> {
    serde_json::from_str(text).map_err(|err| Error::Decode(err.to_string()))
}
