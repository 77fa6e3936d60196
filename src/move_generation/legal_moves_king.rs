use crate::game_state::chess_rules::castling_geometry;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::{is_king_in_check, is_square_attacked};

/// Whether `color` may castle on the given side right now.
///
/// Requires the matching right, king and rook on their home squares, an empty
/// path between them, and no attacked square among the king's start, transit
/// and landing squares. Queenside also needs the b-file square empty.
pub fn can_castle(game_state: &GameState, color: Color, kingside: bool) -> bool {
    if game_state.castling_rights & castling_flag(color, kingside) == 0 {
        return false;
    }

    let geometry = castling_geometry(color, kingside);

    let king_home = game_state
        .piece_at(geometry.king_from)
        .is_some_and(|piece| piece.kind == PieceKind::King && piece.color == color);
    let rook_home = game_state
        .piece_at(geometry.rook_from)
        .is_some_and(|piece| piece.kind == PieceKind::Rook && piece.color == color);
    if !king_home || !rook_home {
        return false;
    }

    // Cannot castle out of check.
    if is_king_in_check(game_state, color) {
        return false;
    }

    if geometry
        .must_be_empty
        .iter()
        .any(|square| !game_state.is_empty(*square))
    {
        return false;
    }

    let enemy = color.opposite();
    !geometry
        .must_be_safe
        .iter()
        .any(|square| is_square_attacked(game_state, *square, enemy))
}

/// Castling destinations currently available to the king of `color`.
pub fn castling_destinations(game_state: &GameState, color: Color) -> Vec<Square> {
    [true, false]
        .into_iter()
        .filter(|kingside| can_castle(game_state, color, *kingside))
        .map(|kingside| castling_geometry(color, kingside).king_to)
        .collect()
}
