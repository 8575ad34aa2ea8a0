use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Function;
use log::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

use crate::board::Board;
use crate::codec;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::logging;
use crate::piece::Piece;
use crate::session::Session;
use crate::sync::{ConnectionState, Transport};
use crate::types::Position;

/// Browser `WebSocket` as the peer connection.
struct WebSocketTransport {
    socket: WebSocket,
}

impl Transport for WebSocketTransport {
    fn send_text(&self, payload: &str) -> Result<()> {
        self.socket
            .send_with_str(payload)
            .map_err(|err| Error::Send(describe(&err)))
    }
}

type SharedSession = Rc<RefCell<Session<WebSocketTransport>>>;

/// Board client exported to the page.
///
/// Opens one socket to the configured endpoint and calls `on_change(cells)`
/// with the renderer view after every installed snapshot, local or remote.
#[wasm_bindgen]
pub struct ChessBoardClient {
    session: SharedSession,
    socket: WebSocket,
    on_change: Function,
    handlers: Option<SocketHandlers>,
}

struct SocketHandlers {
    _on_open: Closure<dyn FnMut(Event)>,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_error: Closure<dyn FnMut(Event)>,
    _on_close: Closure<dyn FnMut(CloseEvent)>,
}

#[wasm_bindgen]
impl ChessBoardClient {
    /// `config` may be `undefined` for defaults, or `{ endpoint, log_level }`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, on_change: Function) -> std::result::Result<ChessBoardClient, JsValue> {
        let config = read_config(config).map_err(to_js_error)?;
        logging::init(config.level().map_err(to_js_error)?);

        let socket = WebSocket::new(&config.endpoint)?;
        let session = Rc::new(RefCell::new(Session::new(WebSocketTransport {
            socket: socket.clone(),
        })));
        let handlers = attach_handlers(&socket, &session, &on_change);
        info!("connecting to {}", config.endpoint);

        Ok(Self {
            session,
            socket,
            on_change,
            handlers: Some(handlers),
        })
    }

    /// Renderer view of the current board: 64 cells, row-major.
    pub fn cells(&self) -> std::result::Result<JsValue, JsValue> {
        let view = self.session.borrow().board().to_view();
        Ok(serde_wasm_bindgen::to_value(&view.cells)?)
    }

    /// Current board in wire format, the same text sent to the peer.
    pub fn board(&self) -> std::result::Result<String, JsValue> {
        codec::encode(self.session.borrow().board()).map_err(to_js_error)
    }

    pub fn board_text(&self) -> String {
        self.session.borrow().board().to_string()
    }

    pub fn state(&self) -> String {
        match self.session.borrow().connection_state() {
            ConnectionState::Connected => "connected".to_string(),
            ConnectionState::Disconnected => "disconnected".to_string(),
        }
    }

    pub fn drag_start(&self, row: u8, col: u8) -> std::result::Result<(), JsValue> {
        self.session
            .borrow_mut()
            .drag_start(Position::new(row, col))
            .map_err(to_js_error)
    }

    /// Returns `true` when the drop produced a move.
    pub fn drop_piece(&self, kind: &str, row: u8, col: u8) -> std::result::Result<bool, JsValue> {
        let installed = self
            .session
            .borrow_mut()
            .drop_piece(kind, Position::new(row, col))
            .map_err(to_js_error)?
            .copied();
        Ok(match installed {
            Some(board) => {
                notify(&self.on_change, &board);
                true
            }
            None => false,
        })
    }

    pub fn move_piece(
        &self,
        from_row: u8,
        from_col: u8,
        to_row: u8,
        to_col: u8,
    ) -> std::result::Result<(), JsValue> {
        let board = *self
            .session
            .borrow_mut()
            .move_piece(Position::new(from_row, from_col), Position::new(to_row, to_col))
            .map_err(to_js_error)?;
        notify(&self.on_change, &board);
        Ok(())
    }

    /// Applies a `"from_row from_col to_row to_col"` command.
    pub fn apply_text_move(&self, command: &str) -> std::result::Result<(), JsValue> {
        let board = *self
            .session
            .borrow_mut()
            .apply_text_move(command)
            .map_err(to_js_error)?;
        notify(&self.on_change, &board);
        Ok(())
    }

    /// Releases the inbound subscription and closes the socket.
    pub fn close(&mut self) {
        self.release();
    }
}

impl ChessBoardClient {
    fn release(&mut self) {
        if self.handlers.take().is_none() {
            return;
        }
        self.socket.set_onopen(None);
        self.socket.set_onmessage(None);
        self.socket.set_onerror(None);
        self.socket.set_onclose(None);
        if let Err(err) = self.socket.close() {
            warn!("socket close failed: {}", describe(&err));
        }
        self.session.borrow_mut().on_close();
    }
}

impl Drop for ChessBoardClient {
    fn drop(&mut self) {
        self.release();
    }
}

/// Maps a piece symbol to its image asset, e.g. `'k'` -> `black-king.svg`.
#[wasm_bindgen]
pub fn piece_asset(symbol: char) -> Option<String> {
    Piece::from_symbol(symbol).map(|piece| piece.asset().to_string())
}

/// Renderer view of a wire-format snapshot.
#[wasm_bindgen]
pub fn decode_cells(text: &str) -> std::result::Result<JsValue, JsValue> {
    let board = codec::decode(text).map_err(to_js_error)?;
    Ok(serde_wasm_bindgen::to_value(&board.to_view().cells)?)
}

/// Wire-format snapshot of the starting arrangement.
#[wasm_bindgen]
pub fn initial_snapshot() -> std::result::Result<String, JsValue> {
    codec::encode(&Board::initial()).map_err(to_js_error)
}

fn read_config(value: JsValue) -> Result<ClientConfig> {
    let config = if value.is_undefined() || value.is_null() {
        ClientConfig::default()
    } else {
        serde_wasm_bindgen::from_value(value).map_err(|err| Error::Config(err.to_string()))?
    };
    config.validated()
}

fn attach_handlers(
    socket: &WebSocket,
    session: &SharedSession,
    on_change: &Function,
) -> SocketHandlers {
    let on_open = {
        let session = Rc::clone(session);
        Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            session.borrow_mut().on_open();
        })
    };

    let on_message = {
        let session = Rc::clone(session);
        let on_change = on_change.clone();
        Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            let Some(text) = event.data().as_string() else {
                warn!("discarding non-text message");
                return;
            };
            let installed = session.borrow_mut().receive_message(&text).copied();
            if let Some(board) = installed {
                notify(&on_change, &board);
            }
        })
    };

    let on_error = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        warn!("socket error: {}", event.type_());
    });

    let on_close = {
        let session = Rc::clone(session);
        Closure::<dyn FnMut(CloseEvent)>::new(move |event: CloseEvent| {
            info!("socket closed: code {} {:?}", event.code(), event.reason());
            session.borrow_mut().on_close();
        })
    };

    socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));
    socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
    socket.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));

    SocketHandlers {
        _on_open: on_open,
        _on_message: on_message,
        _on_error: on_error,
        _on_close: on_close,
    }
}

/// Hands the renderer a fresh view. Called with no session borrow held, so
/// the callback may read back into the client.
fn notify(on_change: &Function, board: &Board) {
    let cells = match serde_wasm_bindgen::to_value(&board.to_view().cells) {
        Ok(cells) => cells,
        Err(err) => {
            warn!("could not build board view: {err}");
            return;
        }
    };
    if let Err(err) = on_change.call1(&JsValue::NULL, &cells) {
        warn!("on_change callback failed: {}", describe(&err));
    }
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn to_js_error(err: Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}
