//! Canonical board state.
//!
//! `GameState` is the position model: the piece arena, side to move, castling
//! rights, en-passant target, clocks, the status flags of the side to move, and
//! the undo stack. It holds no rule knowledge; rules live in
//! `move_generation` and mutate the state through its public fields.

use crate::chess_errors::ChessErrors;
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_generator::refresh_game_status;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    // --- Piece arena (captured pieces stay, flagged inactive) ---
    pub pieces: Vec<Piece>,

    // --- Side and state flags ---
    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,

    // --- Clocks / move counters ---
    pub halfmove_clock: u16,
    pub fullmove_number: u16,

    // --- Status of the side to move ---
    pub in_check: bool,
    pub checkmate: bool,
    pub stalemate: bool,

    // --- Make/unmake stack ---
    pub undo_stack: Vec<UndoState>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            pieces: Vec::with_capacity(32),

            side_to_move: Color::Light,
            castling_rights: 0,
            en_passant_square: None,

            halfmove_clock: 0,
            fullmove_number: 1,

            in_check: false,
            checkmate: false,
            stalemate: false,

            undo_stack: Vec::new(),
        }
    }
}

impl GameState {
    /// Empty board, Light to move, no rights.
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Standard 32-piece starting position.
    pub fn new_game() -> Self {
        let mut game_state = Self::new_empty();
        game_state.reset();
        game_state
    }

    pub fn from_fen(fen: &str) -> Result<Self, ChessErrors> {
        let mut game_state = parse_fen(fen)?;
        refresh_game_status(&mut game_state);
        Ok(game_state)
    }

    /// Replace the whole position from `fen`.
    ///
    /// The string is fully parsed into a fresh state before anything is
    /// replaced, so a rejected FEN leaves `self` untouched.
    pub fn load_fen(&mut self, fen: &str) -> Result<(), ChessErrors> {
        *self = Self::from_fen(fen)?;
        Ok(())
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    /// Restore the starting array and clear all history.
    pub fn reset(&mut self) {
        *self = Self::from_fen(STARTING_POSITION_FEN).expect("starting FEN should always parse");
    }

    /// First active piece standing on `square`.
    #[inline]
    pub fn piece_id_at(&self, square: Square) -> Option<PieceId> {
        self.pieces
            .iter()
            .position(|piece| piece.active && piece.square == square)
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.piece_id_at(square).map(|id| &self.pieces[id])
    }

    #[inline]
    pub fn is_empty(&self, square: Square) -> bool {
        self.piece_id_at(square).is_none()
    }

    /// Square of the active king of `color`.
    ///
    /// `None` only for malformed positions; callers treat a missing king as
    /// "no check possible".
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces
            .iter()
            .find(|piece| piece.active && piece.color == color && piece.kind == PieceKind::King)
            .map(|piece| piece.square)
    }

    /// Ids of the active pieces of `color`, in arena order.
    pub fn active_piece_ids(&self, color: Color) -> Vec<PieceId> {
        self.pieces
            .iter()
            .enumerate()
            .filter(|(_, piece)| piece.active && piece.color == color)
            .map(|(id, _)| id)
            .collect()
    }

    /// Append a piece to the arena and return its id.
    pub fn add_piece(&mut self, piece: Piece) -> PieceId {
        self.pieces.push(piece);
        self.pieces.len() - 1
    }

    #[inline]
    pub fn last_move(&self) -> Option<&UndoState> {
        self.undo_stack.last()
    }
}

#[cfg(test)]
mod tests {
    use super::GameState;
    use crate::game_state::chess_rules::{E1, E8, STARTING_POSITION_FEN};
    use crate::game_state::chess_types::{Color, PieceKind};
    use crate::utils::algebraic::algebraic_to_square;

    #[test]
    fn new_game_has_full_starting_array() {
        let game_state = GameState::new_game();

        assert_eq!(game_state.pieces.len(), 32);
        assert!(game_state.pieces.iter().all(|piece| piece.active));
        assert_eq!(game_state.side_to_move, Color::Light);
        assert_eq!(game_state.king_square(Color::Light), Some(E1));
        assert_eq!(game_state.king_square(Color::Dark), Some(E8));
        assert_eq!(game_state.get_fen(), STARTING_POSITION_FEN);
        assert!(!game_state.in_check && !game_state.checkmate && !game_state.stalemate);
    }

    #[test]
    fn piece_at_ignores_inactive_slots() {
        let mut game_state = GameState::new_game();
        let e2 = algebraic_to_square("e2").expect("e2 should parse");
        let id = game_state.piece_id_at(e2).expect("pawn should stand on e2");
        assert_eq!(game_state.pieces[id].kind, PieceKind::Pawn);

        game_state.pieces[id].active = false;
        assert!(game_state.piece_at(e2).is_none());
        assert!(game_state.is_empty(e2));
    }

    #[test]
    fn missing_king_reports_none() {
        let game_state =
            GameState::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        assert_eq!(game_state.king_square(Color::Dark), None);
        assert!(!game_state.in_check);
    }

    #[test]
    fn rejected_fen_keeps_previous_position() {
        let mut game_state = GameState::new_game();
        let before = game_state.clone();

        assert!(game_state.load_fen("8/8/8 w - - 0 1").is_err());
        assert!(game_state.load_fen("8/8/8/8/8/8/8/8 w - -").is_err());
        assert_eq!(game_state, before);
    }

    #[test]
    fn reset_clears_history_and_rights() {
        let mut game_state =
            GameState::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 12 40").expect("FEN should parse");
        game_state.reset();

        assert_eq!(game_state.get_fen(), STARTING_POSITION_FEN);
        assert!(game_state.undo_stack.is_empty());
    }
}
