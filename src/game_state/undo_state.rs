use crate::game_state::chess_types::*;

/// Single history record pushed by `attempt_move` and popped by
/// `undo_last_move`.
///
/// Rights, en-passant target and clocks are copied verbatim before the move
/// and restored verbatim on undo; they are never recomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoState {
    pub from: Square,
    pub to: Square,

    pub moved_piece_id: PieceId,
    pub moved_piece: PieceKind,
    pub moved_color: Color,

    /// Arena slot of the captured piece; shares identity with the piece list.
    pub captured_piece_id: Option<PieceId>,
    /// Rook relocated alongside the king when `was_castle` is set.
    pub castling_rook_id: Option<PieceId>,

    pub was_castle: bool,
    pub was_en_passant: bool,
    pub was_promotion: bool,
    pub promotion_piece: Option<PieceKind>,

    pub prev_castling_rights: CastlingRights,
    pub prev_en_passant_square: Option<Square>,
    pub prev_halfmove_clock: u16,
    pub prev_fullmove_number: u16,
}

impl UndoState {
    /// Square the captured piece stood on before the capture.
    ///
    /// Equals `to` except for en passant, where the victim sits one rank
    /// behind the destination.
    pub fn capture_square(&self) -> Square {
        if self.was_en_passant {
            make_square(file_of(self.to), rank_of(self.from))
        } else {
            self.to
        }
    }
}
