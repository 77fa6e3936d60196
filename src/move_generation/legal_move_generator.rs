//! Legal move enumeration and game-status classification.
//!
//! For each piece, geometric candidate destinations (a superset of every
//! pseudo-legal destination) are generated, then filtered through
//! `is_pseudo_legal` and `would_cause_self_check`. Castling destinations are
//! appended for kings via `can_castle`.

use crate::game_state::chess_rules::pawn_direction;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::{
    is_king_in_check, is_pseudo_legal, would_cause_self_check,
};
use crate::move_generation::legal_move_shared::{
    BISHOP_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, ROOK_DIRECTIONS,
};
use crate::move_generation::legal_moves_king::castling_destinations;

/// A legal (from, to) pair. Promotion choice is applied separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegalMove {
    pub from: Square,
    pub to: Square,
}

/// Geometric destinations `piece` could reach on an otherwise empty board,
/// with sliding rays cut at the first occupied square.
pub fn candidate_destinations(game_state: &GameState, piece: &Piece) -> Vec<Square> {
    let mut out = Vec::with_capacity(28);
    let from = piece.square;

    match piece.kind {
        PieceKind::Pawn => {
            let direction = pawn_direction(piece.color);
            for (d_file, d_rank) in [(0, direction), (0, 2 * direction), (-1, direction), (1, direction)] {
                if let Some(to) = offset_square(from, d_file, d_rank) {
                    out.push(to);
                }
            }
        }
        PieceKind::Knight => push_offsets(from, &KNIGHT_OFFSETS, &mut out),
        PieceKind::King => push_offsets(from, &KING_OFFSETS, &mut out),
        PieceKind::Bishop => push_rays(game_state, from, &BISHOP_DIRECTIONS, &mut out),
        PieceKind::Rook => push_rays(game_state, from, &ROOK_DIRECTIONS, &mut out),
        PieceKind::Queen => {
            push_rays(game_state, from, &ROOK_DIRECTIONS, &mut out);
            push_rays(game_state, from, &BISHOP_DIRECTIONS, &mut out);
        }
    }

    out
}

fn push_offsets(from: Square, offsets: &[(i8, i8)], out: &mut Vec<Square>) {
    out.extend(
        offsets
            .iter()
            .filter_map(|(d_file, d_rank)| offset_square(from, *d_file, *d_rank)),
    );
}

fn push_rays(game_state: &GameState, from: Square, directions: &[(i8, i8)], out: &mut Vec<Square>) {
    for (d_file, d_rank) in directions {
        let mut current = from;
        while let Some(next) = offset_square(current, *d_file, *d_rank) {
            out.push(next);
            if !game_state.is_empty(next) {
                break;
            }
            current = next;
        }
    }
}

/// Legal destinations for the piece in slot `piece_id`, castling included.
pub fn legal_destinations(game_state: &mut GameState, piece_id: PieceId) -> Vec<Square> {
    let piece = game_state.pieces[piece_id];
    if !piece.active {
        return Vec::new();
    }

    let mut legal = Vec::new();
    for to in candidate_destinations(game_state, &piece) {
        if is_pseudo_legal(game_state, &piece, piece.square, to)
            && !would_cause_self_check(game_state, piece_id, to)
        {
            legal.push(to);
        }
    }

    if piece.kind == PieceKind::King {
        legal.extend(castling_destinations(game_state, piece.color));
    }

    legal
}

/// Every legal move for the side to move, generated in place.
pub fn generate_legal_moves_in_place(game_state: &mut GameState) -> Vec<LegalMove> {
    let side = game_state.side_to_move;
    let mut moves = Vec::with_capacity(48);

    for piece_id in game_state.active_piece_ids(side) {
        let from = game_state.pieces[piece_id].square;
        moves.extend(
            legal_destinations(game_state, piece_id)
                .into_iter()
                .map(|to| LegalMove { from, to }),
        );
    }

    moves
}

/// True as soon as one legal move for `color` is found.
pub fn has_any_legal_move(game_state: &mut GameState, color: Color) -> bool {
    for piece_id in game_state.active_piece_ids(color) {
        let piece = game_state.pieces[piece_id];
        for to in candidate_destinations(game_state, &piece) {
            if is_pseudo_legal(game_state, &piece, piece.square, to)
                && !would_cause_self_check(game_state, piece_id, to)
            {
                return true;
            }
        }
    }

    false
}

/// Recompute check, checkmate and stalemate for the side to move.
pub fn refresh_game_status(game_state: &mut GameState) {
    let side = game_state.side_to_move;
    let in_check = is_king_in_check(game_state, side);
    let any_move = has_any_legal_move(game_state, side);

    game_state.in_check = in_check;
    game_state.checkmate = in_check && !any_move;
    game_state.stalemate = !in_check && !any_move;
}
