//! Errors used throughout the board core and the engine client.
//!
//! Two enums split the failure modes by subsystem:
//!
//! - `ChessErrors` covers malformed input handed to the board core (square
//!   names, FEN strings, UCI move strings, promotion requests). These are
//!   always recoverable: the operation is rejected and the game state is left
//!   exactly as it was.
//! - `EngineErrors` covers the external analysis-engine process (spawn
//!   failures, missing pipes, I/O on the pipes, protocol tokens that never
//!   arrive). A client that reports one of these stays in a non-ready state and
//!   callers treat analysis as unavailable.
//!
//! Rule violations during move entry are not errors; they are reported as
//! `MoveOutcome` values by the move executor.

use std::io;

use thiserror::Error;

/// Input errors raised by the board core and its notation codecs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChessErrors {
    /// A square name could not be interpreted (wrong length, file outside
    /// `a..h`, rank outside `1..8`).
    #[error("invalid algebraic square '{0}'")]
    InvalidAlgebraicString(String),

    /// A square index was outside `0..=63`.
    #[error("square index out of bounds: {0}")]
    SquareOutOfBounds(u8),

    /// The FEN string was rejected; the payload describes the offending field.
    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    /// A UCI move string was too short, too long, or named invalid squares.
    #[error("invalid UCI move '{0}'")]
    InvalidUciMove(String),

    /// A promotion letter or piece kind that a pawn cannot promote to.
    #[error("invalid promotion piece '{0}'")]
    InvalidPromotionPiece(char),

    /// `apply_promotion` was called but the last move was not a pawn reaching
    /// its final rank.
    #[error("the last move cannot be promoted")]
    NothingToPromote,
}

/// Failures of the external engine process and its text protocol.
#[derive(Debug, Error)]
pub enum EngineErrors {
    /// The engine executable could not be started.
    #[error("failed to spawn engine '{path}': {source}")]
    Spawn {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The child process was started without one of its stdio pipes.
    #[error("engine process is missing its {0} pipe")]
    MissingPipe(&'static str),

    /// Writing to the engine failed (usually because it already exited).
    #[error("engine pipe I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The engine did not answer with `token` within the allowed window.
    #[error("engine did not answer '{token}' within {waited_ms} ms")]
    HandshakeTimeout { token: &'static str, waited_ms: u128 },

    /// The operation requires a client that completed its handshake.
    #[error("engine is not ready")]
    NotReady,
}
