//! Board-facing API used by a UI layer.
//!
//! Squares are algebraic names in either case ("e4", "E4"). Bad input is
//! reported through `bool`/`Option` results and a `debug!` log line; the
//! position is never left half-updated.

use log::debug;

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::{
    apply_promotion, attempt_move, is_promotion_pending, undo_last_move,
};
use crate::move_generation::legal_move_generator::legal_destinations;
use crate::utils::algebraic::algebraic_to_square;
use crate::utils::long_algebraic::{parse_uci_move, record_to_uci};
use crate::utils::pgn::write_pgn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceInfo {
    pub kind: PieceKind,
    pub color: Color,
}

#[derive(Debug, Clone)]
pub struct BoardSession {
    game_state: GameState,
    selected: Option<Square>,
    hovered: Option<Square>,
    hover_hint: Vec<Square>,
}

impl Default for BoardSession {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardSession {
    pub fn new() -> Self {
        Self {
            game_state: GameState::new_game(),
            selected: None,
            hovered: None,
            hover_hint: Vec::new(),
        }
    }

    pub fn from_fen(fen: &str) -> Option<Self> {
        let mut session = Self::new();
        session.load_fen(fen).then_some(session)
    }

    #[inline]
    pub fn game_state(&self) -> &GameState {
        &self.game_state
    }

    // --- Selection ---

    /// Pick up the piece on `square` if it belongs to the side to move.
    pub fn click(&mut self, square: &str) -> bool {
        let Some(square) = parse_square(square) else {
            self.selected = None;
            self.refresh_hint();
            return false;
        };

        let owned = self
            .game_state
            .piece_at(square)
            .is_some_and(|piece| piece.color == self.game_state.side_to_move);
        if !owned {
            debug!("click on {square} ignored: no piece of the side to move");
            self.selected = None;
            self.refresh_hint();
            return false;
        }

        self.selected = Some(square);
        self.refresh_hint();
        true
    }

    /// Drop the selected piece on `square`.
    ///
    /// Returns `None` when nothing was selected, the square is invalid, or the
    /// piece is released on its own square. The selection is cleared either way.
    pub fn release(&mut self, square: &str) -> Option<MoveOutcome> {
        let from = self.selected.take()?;
        self.refresh_hint();
        let to = parse_square(square)?;
        if from == to {
            return None;
        }

        let outcome = attempt_move(&mut self.game_state, from, to);
        if outcome != MoveOutcome::Applied {
            debug!("move {from}->{to} rejected: {outcome:?}");
        }
        self.refresh_hint();
        Some(outcome)
    }

    pub fn cancel_selection(&mut self) {
        self.selected = None;
        self.refresh_hint();
    }

    #[inline]
    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    /// Record the hovered square and recompute the destination hint.
    ///
    /// The hint shows the selected piece's destinations while one is held,
    /// otherwise those of a hovered piece of the side to move.
    pub fn update_hover_hint(&mut self, square: &str) -> &[Square] {
        self.hovered = parse_square(square);
        self.refresh_hint();
        &self.hover_hint
    }

    #[inline]
    pub fn hover_hint(&self) -> &[Square] {
        &self.hover_hint
    }

    fn refresh_hint(&mut self) {
        let source = self.selected.or(self.hovered);
        self.hover_hint = match source {
            Some(square) => self.destinations_from(square),
            None => Vec::new(),
        };
    }

    fn destinations_from(&mut self, square: Square) -> Vec<Square> {
        let side = self.game_state.side_to_move;
        match self.game_state.piece_id_at(square) {
            Some(id) if self.game_state.pieces[id].color == side => {
                legal_destinations(&mut self.game_state, id)
            }
            _ => Vec::new(),
        }
    }

    /// Legal destinations of the piece on `square` for the side to move.
    pub fn legal_destinations(&mut self, square: &str) -> Vec<Square> {
        match parse_square(square) {
            Some(square) => self.destinations_from(square),
            None => Vec::new(),
        }
    }

    // --- Position I/O ---

    pub fn load_fen(&mut self, fen: &str) -> bool {
        match self.game_state.load_fen(fen) {
            Ok(()) => {
                self.clear_interaction();
                true
            }
            Err(e) => {
                debug!("FEN rejected: {e}");
                false
            }
        }
    }

    #[inline]
    pub fn export_fen(&self) -> String {
        self.game_state.get_fen()
    }

    pub fn export_pgn(&self) -> String {
        write_pgn(&self.game_state)
    }

    pub fn reset(&mut self) {
        self.game_state.reset();
        self.clear_interaction();
    }

    // --- Moves ---

    /// Apply a UCI move such as "e2e4" or "e7e8q".
    ///
    /// A promotion letter must match a move that actually promotes; otherwise
    /// the move is taken back and `false` returned.
    pub fn apply_uci_move(&mut self, uci: &str) -> bool {
        let mv = match parse_uci_move(uci) {
            Ok(mv) => mv,
            Err(e) => {
                debug!("{e}");
                return false;
            }
        };

        let outcome = attempt_move(&mut self.game_state, mv.from, mv.to);
        if outcome != MoveOutcome::Applied {
            debug!("move {uci} rejected: {outcome:?}");
            return false;
        }

        if let Some(kind) = mv.promotion {
            if let Err(e) = apply_promotion(&mut self.game_state, kind) {
                debug!("move {uci} taken back: {e}");
                undo_last_move(&mut self.game_state);
                return false;
            }
        }

        self.clear_interaction();
        true
    }

    pub fn last_move_as_uci(&self) -> Option<String> {
        self.game_state
            .last_move()
            .and_then(|record| record_to_uci(record).ok())
    }

    /// True while the last move left a pawn on its final rank unpromoted.
    #[inline]
    pub fn needs_promotion(&self) -> bool {
        is_promotion_pending(&self.game_state)
    }

    pub fn promote_last_move(&mut self, kind: PieceKind) -> bool {
        match apply_promotion(&mut self.game_state, kind) {
            Ok(()) => true,
            Err(e) => {
                debug!("promotion rejected: {e}");
                false
            }
        }
    }

    pub fn undo(&mut self) -> bool {
        let undone = undo_last_move(&mut self.game_state);
        if undone {
            self.clear_interaction();
        }
        undone
    }

    fn clear_interaction(&mut self) {
        self.selected = None;
        self.refresh_hint();
    }

    // --- Status ---

    #[inline]
    pub fn is_in_check(&self) -> bool {
        self.game_state.in_check
    }

    #[inline]
    pub fn is_checkmate(&self) -> bool {
        self.game_state.checkmate
    }

    #[inline]
    pub fn is_stalemate(&self) -> bool {
        self.game_state.stalemate
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.game_state.side_to_move
    }

    pub fn piece_at(&self, square: &str) -> Option<PieceInfo> {
        let square = parse_square(square)?;
        self.game_state.piece_at(square).map(|piece| PieceInfo {
            kind: piece.kind,
            color: piece.color,
        })
    }
}

fn parse_square(square: &str) -> Option<Square> {
    match algebraic_to_square(square.trim()) {
        Ok(square) => Some(square),
        Err(e) => {
            debug!("{e}");
            None
        }
    }
}
