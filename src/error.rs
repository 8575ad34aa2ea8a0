use thiserror::Error as ThisError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised by the board core and its synchronization channel.
///
/// None of these are fatal to a session: callers either reject the single
/// request that produced them or log and continue with the prior snapshot.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    #[error("cell ({row}, {col}) is outside the 8x8 board")]
    OutOfRange { row: i64, col: i64 },
    #[error("could not decode board snapshot: {0}")]
    Decode(String),
    #[error("could not encode board snapshot: {0}")]
    Encode(String),
    #[error("could not send board snapshot: {0}")]
    Send(String),
    #[error("invalid move command {input:?}: {reason}")]
    InvalidMove { input: String, reason: String },
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn out_of_range(row: impl Into<i64>, col: impl Into<i64>) -> Self {
        Self::OutOfRange {
            row: row.into(),
            col: col.into(),
        }
    }
}
