//! Square name conversions.
//!
//! Maps algebraic coordinates (`"e4"`, `"E4"`) to square indices and back.
//! Parsing accepts either case; output is lowercase for FEN/UCI and
//! uppercase for the board-facing display form.

use crate::chess_errors::ChessErrors;
use crate::game_state::chess_types::{file_of, make_square, rank_of, Square};

/// Convert an algebraic square name (for example: "e4" or "E4") to a square index.
#[inline]
pub fn algebraic_to_square(square: &str) -> Result<Square, ChessErrors> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(ChessErrors::InvalidAlgebraicString(square.to_owned()));
    }

    let file = bytes[0].to_ascii_lowercase();
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(ChessErrors::InvalidAlgebraicString(square.to_owned()));
    }

    Ok(make_square(file - b'a', rank - b'1'))
}

/// Convert a square index (`0..=63`) to lowercase algebraic notation ("e4").
#[inline]
pub fn square_to_algebraic(square: Square) -> Result<String, ChessErrors> {
    if square > 63 {
        return Err(ChessErrors::SquareOutOfBounds(square));
    }

    let file_char = char::from(b'a' + file_of(square));
    let rank_char = char::from(b'1' + rank_of(square));

    Ok(format!("{file_char}{rank_char}"))
}

/// Uppercase display form ("E4") used by the board-facing API.
#[inline]
pub fn square_to_display(square: Square) -> Result<String, ChessErrors> {
    square_to_algebraic(square).map(|name| name.to_ascii_uppercase())
}
