//! Terminal-oriented board renderers.
//!
//! A Unicode view for the console and an ASCII view (FEN letters) that is
//! easier to assert on in tests and logs.

use crate::game_state::{chess_types::*, game_state::GameState};

/// Render the board to a Unicode string for terminal output.
///
/// Rank 8 is printed first; `0 == a1`, `63 == h8`.
pub fn render_game_state(game_state: &GameState) -> String {
    render_with(game_state, piece_to_unicode, '·')
}

/// Same layout as [`render_game_state`] using FEN letters and `.` for empty.
pub fn render_game_state_ascii(game_state: &GameState) -> String {
    render_with(game_state, |piece| piece.fen_char(), '.')
}

fn render_with(game_state: &GameState, glyph: impl Fn(&Piece) -> char, empty: char) -> String {
    let mut out = String::new();

    out.push_str("  a b c d e f g h\n");

    for rank in (0..8u8).rev() {
        out.push(char::from(b'1' + rank));
        out.push(' ');

        for file in 0..8u8 {
            match game_state.piece_at(make_square(file, rank)) {
                Some(piece) => out.push(glyph(piece)),
                None => out.push(empty),
            }

            if file < 7 {
                out.push(' ');
            }
        }

        out.push(' ');
        out.push(char::from(b'1' + rank));
        out.push('\n');
    }

    out.push_str("  a b c d e f g h");

    out
}

fn piece_to_unicode(piece: &Piece) -> char {
    match (piece.color, piece.kind) {
        (Color::Light, PieceKind::Pawn) => '♙',
        (Color::Light, PieceKind::Knight) => '♘',
        (Color::Light, PieceKind::Bishop) => '♗',
        (Color::Light, PieceKind::Rook) => '♖',
        (Color::Light, PieceKind::Queen) => '♕',
        (Color::Light, PieceKind::King) => '♔',
        (Color::Dark, PieceKind::Pawn) => '♟',
        (Color::Dark, PieceKind::Knight) => '♞',
        (Color::Dark, PieceKind::Bishop) => '♝',
        (Color::Dark, PieceKind::Rook) => '♜',
        (Color::Dark, PieceKind::Queen) => '♛',
        (Color::Dark, PieceKind::King) => '♚',
    }
}
