use wasm_bindgen::prelude::*;

pub mod board;
pub mod codec;
pub mod config;
pub mod error;
pub mod gesture;
pub mod logging;
pub mod piece;
pub mod session;
pub mod sync;
pub mod types;
pub mod wasm;

pub use board::Board;
pub use error::Error;
pub use piece::{Kind, Piece, Side};
pub use session::Session;
pub use sync::{ConnectionState, SyncChannel, Transport};
pub use types::{Move, Position};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
