//! Canonical chess-rule constants.
//!
//! This module stores static rule-related literals such as the standard
//! starting position FEN and the home squares that castling depends on.

use crate::game_state::chess_types::{Color, Square};

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Square indices use `0 == a1`, `7 == h1`, `63 == h8`.
pub const A1: Square = 0;
pub const B1: Square = 1;
pub const C1: Square = 2;
pub const D1: Square = 3;
pub const E1: Square = 4;
pub const F1: Square = 5;
pub const G1: Square = 6;
pub const H1: Square = 7;
pub const A8: Square = 56;
pub const B8: Square = 57;
pub const C8: Square = 58;
pub const D8: Square = 59;
pub const E8: Square = 60;
pub const F8: Square = 61;
pub const G8: Square = 62;
pub const H8: Square = 63;

/// Rank index (0-based) a pawn of `color` starts on.
#[inline]
pub const fn pawn_home_rank(color: Color) -> u8 {
    match color {
        Color::Light => 1,
        Color::Dark => 6,
    }
}

/// Rank index (0-based) a pawn of `color` promotes on.
#[inline]
pub const fn promotion_rank(color: Color) -> u8 {
    match color {
        Color::Light => 7,
        Color::Dark => 0,
    }
}

/// Rank step a pawn of `color` advances by.
#[inline]
pub const fn pawn_direction(color: Color) -> i8 {
    match color {
        Color::Light => 1,
        Color::Dark => -1,
    }
}

#[inline]
pub const fn king_home_square(color: Color) -> Square {
    match color {
        Color::Light => E1,
        Color::Dark => E8,
    }
}

/// Fixed squares involved in one castling move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingGeometry {
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares strictly between king and rook; all must be empty.
    pub must_be_empty: &'static [Square],
    /// King start, transit and landing squares; none may be attacked.
    pub must_be_safe: [Square; 3],
}

pub const fn castling_geometry(color: Color, kingside: bool) -> CastlingGeometry {
    match (color, kingside) {
        (Color::Light, true) => CastlingGeometry {
            king_from: E1,
            king_to: G1,
            rook_from: H1,
            rook_to: F1,
            must_be_empty: &[F1, G1],
            must_be_safe: [E1, F1, G1],
        },
        (Color::Light, false) => CastlingGeometry {
            king_from: E1,
            king_to: C1,
            rook_from: A1,
            rook_to: D1,
            must_be_empty: &[D1, C1, B1],
            must_be_safe: [E1, D1, C1],
        },
        (Color::Dark, true) => CastlingGeometry {
            king_from: E8,
            king_to: G8,
            rook_from: H8,
            rook_to: F8,
            must_be_empty: &[F8, G8],
            must_be_safe: [E8, F8, G8],
        },
        (Color::Dark, false) => CastlingGeometry {
            king_from: E8,
            king_to: C8,
            rook_from: A8,
            rook_to: D8,
            must_be_empty: &[D8, C8, B8],
            must_be_safe: [E8, D8, C8],
        },
    }
}
