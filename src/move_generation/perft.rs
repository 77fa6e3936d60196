use std::thread;

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::{
    apply_promotion, attempt_move, is_promotion_pending, undo_last_move,
};
use crate::move_generation::legal_move_generator::{generate_legal_moves_in_place, LegalMove};

const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub checks: usize,
    pub checkmates: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
    }

    fn record_leaf(&mut self, game_state: &GameState) {
        self.nodes += 1;

        let Some(record) = game_state.last_move() else {
            return;
        };
        if record.captured_piece_id.is_some() {
            self.captures += 1;
        }
        if record.was_en_passant {
            self.en_passant += 1;
        }
        if record.was_castle {
            self.castles += 1;
        }
        if record.was_promotion {
            self.promotions += 1;
        }
        if game_state.in_check {
            self.checks += 1;
        }
        if game_state.checkmate {
            self.checkmates += 1;
        }
    }
}

/// Count leaf positions `depth` plies below `game_state`.
///
/// Pawn pushes onto the final rank expand into the four promotion choices.
/// The state is returned to where it started.
pub fn perft(game_state: &mut GameState, depth: u8) -> PerftCounts {
    let mut counts = PerftCounts::default();
    if depth == 0 {
        counts.nodes = 1;
        return counts;
    }

    for mv in generate_legal_moves_in_place(game_state) {
        perft_move(game_state, mv, depth, &mut counts);
    }

    counts
}

/// Same totals as [`perft`], with one worker thread per root move.
pub fn perft_multi_threaded(game_state: &GameState, depth: u8) -> PerftCounts {
    if depth == 0 {
        return PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        };
    }

    let mut root = game_state.clone();
    let root_moves = generate_legal_moves_in_place(&mut root);

    let handles: Vec<_> = root_moves
        .into_iter()
        .map(|mv| {
            let mut local_state = root.clone();
            thread::spawn(move || {
                let mut local = PerftCounts::default();
                perft_move(&mut local_state, mv, depth, &mut local);
                local
            })
        })
        .collect();

    let mut total = PerftCounts::default();
    for handle in handles {
        match handle.join() {
            Ok(local) => total.merge(local),
            Err(_) => log::error!("perft worker thread panicked"),
        }
    }

    total
}

/// Play `mv` (every promotion choice if it promotes), recurse, and undo.
fn perft_move(game_state: &mut GameState, mv: LegalMove, depth: u8, counts: &mut PerftCounts) {
    if attempt_move(game_state, mv.from, mv.to) != MoveOutcome::Applied {
        return;
    }

    if !is_promotion_pending(game_state) {
        descend(game_state, depth, counts);
        undo_last_move(game_state);
        return;
    }
    undo_last_move(game_state);

    for kind in PROMOTION_KINDS {
        if attempt_move(game_state, mv.from, mv.to) != MoveOutcome::Applied {
            return;
        }
        if apply_promotion(game_state, kind).is_ok() {
            descend(game_state, depth, counts);
        }
        undo_last_move(game_state);
    }
}

fn descend(game_state: &mut GameState, depth: u8, counts: &mut PerftCounts) {
    if depth == 1 {
        counts.record_leaf(game_state);
    } else {
        counts.merge(perft(game_state, depth - 1));
    }
}
