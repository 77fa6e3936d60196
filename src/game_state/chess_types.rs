//! Core value types shared by the board model, the rules, and the codecs.
//!
//! Pieces live in an arena (`GameState::pieces`) and are addressed by a
//! stable `PieceId`. Captured pieces are deactivated in place rather than
//! removed, so undo records can bring them back by index.

pub use crate::game_state::game_state::GameState;
pub use crate::game_state::undo_state::UndoState;

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Lowercase FEN letter for this kind.
    #[inline]
    pub const fn fen_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    /// Case-insensitive inverse of [`PieceKind::fen_char`].
    pub fn from_fen_char(ch: char) -> Option<Self> {
        match ch.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Kinds a pawn may promote to.
    #[inline]
    pub const fn is_promotion_target(self) -> bool {
        matches!(
            self,
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen
        )
    }
}

/// Board square index (`0..=63`, `0 == a1`, `63 == h8`).
pub type Square = u8;

/// Stable index of a piece slot in `GameState::pieces`.
pub type PieceId = usize;

/// Castling rights bitmask; each right is an independent flag.
pub type CastlingRights = u8;
pub const CASTLE_LIGHT_KINGSIDE: CastlingRights = 1 << 0;
pub const CASTLE_LIGHT_QUEENSIDE: CastlingRights = 1 << 1;
pub const CASTLE_DARK_KINGSIDE: CastlingRights = 1 << 2;
pub const CASTLE_DARK_QUEENSIDE: CastlingRights = 1 << 3;
pub const CASTLE_ALL: CastlingRights =
    CASTLE_LIGHT_KINGSIDE | CASTLE_LIGHT_QUEENSIDE | CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE;

#[inline]
pub const fn castling_flag(color: Color, kingside: bool) -> CastlingRights {
    match (color, kingside) {
        (Color::Light, true) => CASTLE_LIGHT_KINGSIDE,
        (Color::Light, false) => CASTLE_LIGHT_QUEENSIDE,
        (Color::Dark, true) => CASTLE_DARK_KINGSIDE,
        (Color::Dark, false) => CASTLE_DARK_QUEENSIDE,
    }
}

#[inline]
pub const fn file_of(square: Square) -> u8 {
    square & 7
}

#[inline]
pub const fn rank_of(square: Square) -> u8 {
    square >> 3
}

#[inline]
pub const fn make_square(file: u8, rank: u8) -> Square {
    rank * 8 + file
}

/// Square reached from `square` by the given file/rank offsets, if on board.
#[inline]
pub fn offset_square(square: Square, d_file: i8, d_rank: i8) -> Option<Square> {
    let file = file_of(square) as i8 + d_file;
    let rank = rank_of(square) as i8 + d_rank;
    if (0..8).contains(&file) && (0..8).contains(&rank) {
        Some(make_square(file as u8, rank as u8))
    } else {
        None
    }
}

/// One slot of the piece arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub square: Square,
    /// `false` once captured; the slot is kept so undo can revive it.
    pub active: bool,
}

impl Piece {
    #[inline]
    pub const fn new(kind: PieceKind, color: Color, square: Square) -> Self {
        Self {
            kind,
            color,
            square,
            active: true,
        }
    }

    /// FEN letter, uppercase for Light.
    #[inline]
    pub fn fen_char(&self) -> char {
        let base = self.kind.fen_char();
        match self.color {
            Color::Light => base.to_ascii_uppercase(),
            Color::Dark => base,
        }
    }
}

/// Result of a move attempt. Rejections never mutate the game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Applied,
    Illegal,
    CausesSelfCheck,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_square_stays_on_board() {
        assert_eq!(offset_square(0, -1, 0), None);
        assert_eq!(offset_square(0, 1, 2), Some(make_square(1, 2)));
        assert_eq!(offset_square(63, 0, 1), None);
        assert_eq!(offset_square(63, -7, -7), Some(0));
    }

    #[test]
    fn fen_chars_follow_color_case() {
        assert_eq!(Piece::new(PieceKind::Queen, Color::Light, 3).fen_char(), 'Q');
        assert_eq!(Piece::new(PieceKind::Knight, Color::Dark, 57).fen_char(), 'n');
        assert_eq!(PieceKind::from_fen_char('K'), Some(PieceKind::King));
        assert_eq!(PieceKind::from_fen_char('x'), None);
    }
}
