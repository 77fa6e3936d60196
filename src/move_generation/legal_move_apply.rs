//! Move execution and history.
//!
//! `attempt_move` validates fully before it mutates anything, so a rejected
//! move leaves the position untouched. Every applied move pushes an
//! `UndoState` that `undo_last_move` reverses exactly.

use log::debug;

use crate::chess_errors::ChessErrors;
use crate::game_state::chess_rules::{
    castling_geometry, king_home_square, pawn_direction, promotion_rank,
};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::{
    capture_target, is_king_in_check, is_pseudo_legal, would_cause_self_check,
};
use crate::move_generation::legal_move_generator::refresh_game_status;
use crate::move_generation::legal_move_shared::square_delta;
use crate::move_generation::legal_moves_king::can_castle;

pub fn attempt_move(game_state: &mut GameState, from: Square, to: Square) -> MoveOutcome {
    if from == to || from > 63 || to > 63 {
        return MoveOutcome::Illegal;
    }

    let Some(piece_id) = game_state.piece_id_at(from) else {
        debug!("no piece on square {from}");
        return MoveOutcome::Illegal;
    };
    let piece = game_state.pieces[piece_id];
    if piece.color != game_state.side_to_move {
        debug!("piece on square {from} does not belong to the side to move");
        return MoveOutcome::Illegal;
    }

    let (d_file, d_rank) = square_delta(from, to);
    if piece.kind == PieceKind::King
        && from == king_home_square(piece.color)
        && d_rank == 0
        && d_file.abs() == 2
    {
        return apply_castle(game_state, piece_id, d_file > 0);
    }

    if !is_pseudo_legal(game_state, &piece, from, to) {
        return MoveOutcome::Illegal;
    }
    if would_cause_self_check(game_state, piece_id, to) {
        return MoveOutcome::CausesSelfCheck;
    }

    let captured = capture_target(game_state, &piece, to);
    let was_en_passant = captured.is_some_and(|id| game_state.pieces[id].square != to);

    game_state.undo_stack.push(UndoState {
        from,
        to,
        moved_piece_id: piece_id,
        moved_piece: piece.kind,
        moved_color: piece.color,
        captured_piece_id: captured,
        castling_rook_id: None,
        was_castle: false,
        was_en_passant,
        was_promotion: false,
        promotion_piece: None,
        prev_castling_rights: game_state.castling_rights,
        prev_en_passant_square: game_state.en_passant_square,
        prev_halfmove_clock: game_state.halfmove_clock,
        prev_fullmove_number: game_state.fullmove_number,
    });

    if let Some(captured_id) = captured {
        game_state.pieces[captured_id].active = false;
    }
    game_state.pieces[piece_id].square = to;

    game_state.en_passant_square = if piece.kind == PieceKind::Pawn && d_rank.abs() == 2 {
        offset_square(from, 0, pawn_direction(piece.color))
    } else {
        None
    };

    update_castling_rights(game_state, &piece, from, to);

    if piece.kind == PieceKind::Pawn || captured.is_some() {
        game_state.halfmove_clock = 0;
    } else {
        game_state.halfmove_clock = game_state.halfmove_clock.saturating_add(1);
    }

    finish_turn(game_state, piece.color);
    MoveOutcome::Applied
}

fn apply_castle(game_state: &mut GameState, king_id: PieceId, kingside: bool) -> MoveOutcome {
    let color = game_state.pieces[king_id].color;
    if !can_castle(game_state, color, kingside) {
        return MoveOutcome::Illegal;
    }

    let geometry = castling_geometry(color, kingside);
    let Some(rook_id) = game_state.piece_id_at(geometry.rook_from) else {
        return MoveOutcome::Illegal;
    };

    game_state.undo_stack.push(UndoState {
        from: geometry.king_from,
        to: geometry.king_to,
        moved_piece_id: king_id,
        moved_piece: PieceKind::King,
        moved_color: color,
        captured_piece_id: None,
        castling_rook_id: Some(rook_id),
        was_castle: true,
        was_en_passant: false,
        was_promotion: false,
        promotion_piece: None,
        prev_castling_rights: game_state.castling_rights,
        prev_en_passant_square: game_state.en_passant_square,
        prev_halfmove_clock: game_state.halfmove_clock,
        prev_fullmove_number: game_state.fullmove_number,
    });

    game_state.pieces[king_id].square = geometry.king_to;
    game_state.pieces[rook_id].square = geometry.rook_to;

    game_state.castling_rights &= !(castling_flag(color, true) | castling_flag(color, false));
    game_state.en_passant_square = None;
    game_state.halfmove_clock = game_state.halfmove_clock.saturating_add(1);

    finish_turn(game_state, color);
    MoveOutcome::Applied
}

fn finish_turn(game_state: &mut GameState, mover: Color) {
    if mover == Color::Dark {
        game_state.fullmove_number = game_state.fullmove_number.saturating_add(1);
    }
    game_state.side_to_move = mover.opposite();
    refresh_game_status(game_state);
}

fn update_castling_rights(game_state: &mut GameState, piece: &Piece, from: Square, to: Square) {
    if piece.kind == PieceKind::King {
        game_state.castling_rights &=
            !(castling_flag(piece.color, true) | castling_flag(piece.color, false));
    }

    for color in [Color::Light, Color::Dark] {
        for kingside in [true, false] {
            let corner = castling_geometry(color, kingside).rook_from;
            let rook_left_home = piece.kind == PieceKind::Rook && piece.color == color && from == corner;
            // Capturing a rook on its corner also removes the right.
            let rook_captured = to == corner && piece.color != color;
            if rook_left_home || rook_captured {
                game_state.castling_rights &= !castling_flag(color, kingside);
            }
        }
    }
}

/// Reverse the most recent move. Returns `false` when there is no history.
///
/// Checkmate and stalemate flags are cleared, not recomputed.
pub fn undo_last_move(game_state: &mut GameState) -> bool {
    let Some(record) = game_state.undo_stack.pop() else {
        return false;
    };

    let moved = &mut game_state.pieces[record.moved_piece_id];
    if record.was_promotion {
        moved.kind = PieceKind::Pawn;
    }
    moved.square = record.from;

    if let Some(rook_id) = record.castling_rook_id {
        let geometry = castling_geometry(record.moved_color, file_of(record.to) > file_of(record.from));
        game_state.pieces[rook_id].square = geometry.rook_from;
    }

    if let Some(captured_id) = record.captured_piece_id {
        let captured = &mut game_state.pieces[captured_id];
        captured.square = record.capture_square();
        captured.active = true;
    }

    game_state.castling_rights = record.prev_castling_rights;
    game_state.en_passant_square = record.prev_en_passant_square;
    game_state.halfmove_clock = record.prev_halfmove_clock;
    game_state.fullmove_number = record.prev_fullmove_number;

    game_state.side_to_move = record.moved_color;
    game_state.in_check = is_king_in_check(game_state, record.moved_color);
    game_state.checkmate = false;
    game_state.stalemate = false;

    true
}

/// Promote the pawn moved by the immediately preceding move.
///
/// Valid only when that pawn stands on its final rank and `target` is a
/// knight, bishop, rook or queen. Status flags are recomputed because the new
/// piece may give check.
pub fn apply_promotion(game_state: &mut GameState, target: PieceKind) -> Result<(), ChessErrors> {
    if !target.is_promotion_target() {
        return Err(ChessErrors::InvalidPromotionPiece(target.fen_char()));
    }

    let Some(record) = game_state.undo_stack.last() else {
        return Err(ChessErrors::NothingToPromote);
    };
    let piece = game_state.pieces[record.moved_piece_id];
    if record.was_castle
        || piece.kind != PieceKind::Pawn
        || piece.square != record.to
        || rank_of(piece.square) != promotion_rank(piece.color)
    {
        return Err(ChessErrors::NothingToPromote);
    }

    let moved_piece_id = record.moved_piece_id;
    game_state.pieces[moved_piece_id].kind = target;
    if let Some(record) = game_state.undo_stack.last_mut() {
        record.was_promotion = true;
        record.promotion_piece = Some(target);
    }

    refresh_game_status(game_state);
    Ok(())
}

/// True when the last move left a pawn on its final rank awaiting promotion.
pub fn is_promotion_pending(game_state: &GameState) -> bool {
    game_state.undo_stack.last().is_some_and(|record| {
        let piece = &game_state.pieces[record.moved_piece_id];
        piece.kind == PieceKind::Pawn && rank_of(piece.square) == promotion_rank(piece.color)
    })
}
