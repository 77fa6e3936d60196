//! Seeded random games for exercising the move executor.
//!
//! A playout picks uniformly among the legal moves (and promotion choices)
//! until the game ends or the ply limit is reached. The same seed always
//! produces the same game.

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::{
    apply_promotion, attempt_move, is_promotion_pending, undo_last_move,
};
use crate::move_generation::legal_move_generator::generate_legal_moves_in_place;
use crate::utils::long_algebraic::record_to_uci;

const PROMOTION_CHOICES: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayoutOutcome {
    Checkmate { winner: Color },
    Stalemate,
    MaxPlies,
}

#[derive(Debug, Clone)]
pub struct PlayoutConfig {
    pub max_plies: u16,
    /// Undo and replay every move, asserting the FEN is restored.
    pub verify_undo: bool,
}

impl Default for PlayoutConfig {
    fn default() -> Self {
        Self {
            max_plies: 200,
            verify_undo: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlayoutResult {
    pub outcome: PlayoutOutcome,
    pub final_state: GameState,
    pub moves_uci: Vec<String>,
}

pub fn random_playout(
    initial: &GameState,
    seed: u64,
    config: &PlayoutConfig,
) -> Result<PlayoutResult, String> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = initial.clone();
    let mut moves_uci = Vec::<String>::new();

    for _ in 0..config.max_plies {
        let legal_moves = generate_legal_moves_in_place(&mut state);
        if legal_moves.is_empty() {
            break;
        }

        let chosen = legal_moves[rng.random_range(0..legal_moves.len())];
        let fen_before = state.get_fen();

        if config.verify_undo {
            play(&mut state, chosen.from, chosen.to, None)?;
            undo_last_move(&mut state);
            let fen_after_undo = state.get_fen();
            if fen_after_undo != fen_before {
                return Err(format!(
                    "undo mismatch after {}{}: expected '{fen_before}', got '{fen_after_undo}'",
                    chosen.from, chosen.to
                ));
            }
        }

        let promotion = PROMOTION_CHOICES[rng.random_range(0..PROMOTION_CHOICES.len())];
        play(&mut state, chosen.from, chosen.to, Some(promotion))?;

        if let Some(record) = state.last_move() {
            moves_uci.push(record_to_uci(record).map_err(|e| e.to_string())?);
        }
    }

    let outcome = if state.checkmate {
        PlayoutOutcome::Checkmate {
            winner: state.side_to_move.opposite(),
        }
    } else if state.stalemate {
        PlayoutOutcome::Stalemate
    } else {
        PlayoutOutcome::MaxPlies
    };

    Ok(PlayoutResult {
        outcome,
        final_state: state,
        moves_uci,
    })
}

fn play(
    state: &mut GameState,
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
) -> Result<(), String> {
    let outcome = attempt_move(state, from, to);
    if outcome != MoveOutcome::Applied {
        return Err(format!(
            "generated move {from}->{to} was rejected with {outcome:?} in '{}'",
            state.get_fen()
        ));
    }

    if let Some(kind) = promotion {
        if is_promotion_pending(state) {
            apply_promotion(state, kind).map_err(|e| e.to_string())?;
        }
    }

    Ok(())
}

/// Play a seeded random game, then undo every move and compare each
/// intermediate FEN with the one recorded on the way forward.
///
/// Returns the number of plies checked.
pub fn verify_undo_round_trip(initial: &GameState, seed: u64, max_plies: u16) -> Result<usize, String> {
    let config = PlayoutConfig {
        max_plies,
        verify_undo: true,
    };
    let result = random_playout(initial, seed, &config)?;

    let mut replay = initial.clone();
    let mut forward_fens = vec![replay.get_fen()];
    for uci in &result.moves_uci {
        let mv = crate::utils::long_algebraic::parse_uci_move(uci).map_err(|e| e.to_string())?;
        play(&mut replay, mv.from, mv.to, mv.promotion)?;
        forward_fens.push(replay.get_fen());
    }

    if replay.get_fen() != result.final_state.get_fen() {
        return Err("replayed game diverged from the playout".to_owned());
    }

    forward_fens.pop();
    while let Some(expected) = forward_fens.pop() {
        if !undo_last_move(&mut replay) {
            return Err("history ran out before the initial position".to_owned());
        }
        let actual = replay.get_fen();
        if actual != expected {
            return Err(format!("undo mismatch: expected '{expected}', got '{actual}'"));
        }
    }

    Ok(result.moves_uci.len())
}
