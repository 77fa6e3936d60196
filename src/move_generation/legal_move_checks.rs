//! Move-shape rules, attack detection, and king-safety probing.
//!
//! Everything here reads the position only, except the simulate/rollback
//! helper `with_simulated_move`, which restores every field it touches
//! before returning.

use crate::game_state::chess_rules::{pawn_direction, pawn_home_rank};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::{
    enemy_piece_on, is_diagonal, is_king_step, is_knight_jump, is_path_clear, is_straight_line,
    square_delta,
};

/// Shape rule for `piece` travelling `from -> to`, ignoring king safety.
///
/// Castling is not covered here; it is validated separately by `can_castle`.
pub fn is_pseudo_legal(game_state: &GameState, piece: &Piece, from: Square, to: Square) -> bool {
    if from == to || from > 63 || to > 63 {
        return false;
    }

    let target = game_state.piece_at(to);
    if target.is_some_and(|occupant| occupant.color == piece.color) {
        return false;
    }

    let (d_file, d_rank) = square_delta(from, to);

    match piece.kind {
        PieceKind::Pawn => {
            let direction = pawn_direction(piece.color);

            if d_file == 0 {
                if target.is_some() {
                    return false;
                }
                if d_rank == direction {
                    return true;
                }
                if d_rank == 2 * direction && rank_of(from) == pawn_home_rank(piece.color) {
                    return is_path_clear(game_state, from, to);
                }
                return false;
            }

            d_file.abs() == 1
                && d_rank == direction
                && (target.is_some() || game_state.en_passant_square == Some(to))
        }
        PieceKind::Knight => is_knight_jump(d_file, d_rank),
        PieceKind::Bishop => is_diagonal(d_file, d_rank) && is_path_clear(game_state, from, to),
        PieceKind::Rook => is_straight_line(d_file, d_rank) && is_path_clear(game_state, from, to),
        PieceKind::Queen => {
            (is_straight_line(d_file, d_rank) || is_diagonal(d_file, d_rank))
                && is_path_clear(game_state, from, to)
        }
        PieceKind::King => is_king_step(d_file, d_rank),
    }
}

/// Whether `piece` attacks `square` from where it stands.
///
/// Uses attack geometry: pawns attack their forward diagonals whether or not
/// the square is occupied, and the occupant of `square` is never considered.
pub fn piece_attacks_square(game_state: &GameState, piece: &Piece, square: Square) -> bool {
    if piece.square == square {
        return false;
    }

    let (d_file, d_rank) = square_delta(piece.square, square);

    match piece.kind {
        PieceKind::Pawn => d_file.abs() == 1 && d_rank == pawn_direction(piece.color),
        PieceKind::Knight => is_knight_jump(d_file, d_rank),
        PieceKind::Bishop => {
            is_diagonal(d_file, d_rank) && is_path_clear(game_state, piece.square, square)
        }
        PieceKind::Rook => {
            is_straight_line(d_file, d_rank) && is_path_clear(game_state, piece.square, square)
        }
        PieceKind::Queen => {
            (is_straight_line(d_file, d_rank) || is_diagonal(d_file, d_rank))
                && is_path_clear(game_state, piece.square, square)
        }
        PieceKind::King => is_king_step(d_file, d_rank),
    }
}

/// True if any active piece of `attacker_color` attacks `square`.
///
/// Attackers are not themselves checked for pins.
pub fn is_square_attacked(game_state: &GameState, square: Square, attacker_color: Color) -> bool {
    game_state
        .pieces
        .iter()
        .filter(|piece| piece.active && piece.color == attacker_color)
        .any(|piece| piece_attacks_square(game_state, piece, square))
}

#[inline]
pub fn is_king_in_check(game_state: &GameState, color: Color) -> bool {
    let Some(king_sq) = game_state.king_square(color) else {
        return false;
    };
    is_square_attacked(game_state, king_sq, color.opposite())
}

/// Piece removed if `mover` lands on `to`: the occupant of `to`, or the pawn
/// passed over for an en-passant capture.
pub fn capture_target(game_state: &GameState, mover: &Piece, to: Square) -> Option<PieceId> {
    if let Some(id) = enemy_piece_on(game_state, mover.color, to) {
        return Some(id);
    }

    if mover.kind != PieceKind::Pawn
        || game_state.en_passant_square != Some(to)
        || file_of(mover.square) == file_of(to)
    {
        return None;
    }

    let victim_square = make_square(file_of(to), rank_of(mover.square));
    enemy_piece_on(game_state, mover.color, victim_square)
        .filter(|id| game_state.pieces[*id].kind == PieceKind::Pawn)
}

/// Temporarily play `piece_id -> to`, run `probe` on the resulting position,
/// then restore the mover and any captured piece unconditionally.
pub fn with_simulated_move<R>(
    game_state: &mut GameState,
    piece_id: PieceId,
    to: Square,
    probe: impl FnOnce(&GameState) -> R,
) -> R {
    let from = game_state.pieces[piece_id].square;
    let captured = capture_target(game_state, &game_state.pieces[piece_id], to);

    if let Some(captured_id) = captured {
        game_state.pieces[captured_id].active = false;
    }
    game_state.pieces[piece_id].square = to;

    let result = probe(game_state);

    game_state.pieces[piece_id].square = from;
    if let Some(captured_id) = captured {
        game_state.pieces[captured_id].active = true;
    }

    result
}

/// True if moving `piece_id` to `to` would leave its own king attacked.
pub fn would_cause_self_check(game_state: &mut GameState, piece_id: PieceId, to: Square) -> bool {
    let color = game_state.pieces[piece_id].color;
    with_simulated_move(game_state, piece_id, to, |probe| {
        is_king_in_check(probe, color)
    })
}
