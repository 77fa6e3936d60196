//! Simplified PGN export.
//!
//! Movetext is the moved piece's letter plus its destination square, with
//! `O-O`/`O-O-O` for castling and `=Q` style promotion suffixes. This does
//! not disambiguate and cannot be read back; there is no PGN import.

use std::collections::BTreeMap;

use chrono::Local;

use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::{chess_types::*, game_state::GameState, undo_state::UndoState};
use crate::move_generation::legal_move_apply::undo_last_move;
use crate::utils::algebraic::square_to_algebraic;

/// Export the game recorded in `game_state`'s history with default headers.
pub fn write_pgn(game_state: &GameState) -> String {
    let mut headers = BTreeMap::<String, String>::new();
    headers.insert("Event".to_owned(), "Lampel Chess Game".to_owned());
    headers.insert("Site".to_owned(), "Local".to_owned());
    headers.insert("Date".to_owned(), Local::now().format("%Y.%m.%d").to_string());
    headers.insert("Round".to_owned(), "-".to_owned());
    headers.insert("White".to_owned(), "White".to_owned());
    headers.insert("Black".to_owned(), "Black".to_owned());

    write_pgn_with_headers(game_state, &headers)
}

/// Export with caller-supplied headers. `Result`, `SetUp` and `FEN` are
/// always derived from the game itself.
pub fn write_pgn_with_headers(game_state: &GameState, headers: &BTreeMap<String, String>) -> String {
    let mut headers = headers.clone();
    let result = result_token(game_state);
    headers.insert("Result".to_owned(), result.to_owned());

    let initial_fen = initial_fen(game_state);
    if initial_fen != STARTING_POSITION_FEN {
        headers.insert("SetUp".to_owned(), "1".to_owned());
        headers.insert("FEN".to_owned(), initial_fen);
    }

    let mut out = String::new();
    for (key, value) in &headers {
        out.push_str(&format!("[{} \"{}\"]\n", key, escape_pgn_value(value)));
    }
    out.push('\n');

    let mut movetext_parts = Vec::<String>::with_capacity(game_state.undo_stack.len() + 1);
    for (index, record) in game_state.undo_stack.iter().enumerate() {
        let san = record_to_movetext(record);
        // Number every Light move, and a Dark move that opens the record.
        match record.moved_color {
            Color::Light => {
                movetext_parts.push(format!("{}. {}", record.prev_fullmove_number, san));
            }
            Color::Dark if index == 0 => {
                movetext_parts.push(format!("{}... {}", record.prev_fullmove_number, san));
            }
            Color::Dark => movetext_parts.push(san),
        }
    }

    movetext_parts.push(result.to_owned());
    out.push_str(&movetext_parts.join(" "));
    out.push('\n');

    out
}

fn record_to_movetext(record: &UndoState) -> String {
    if record.was_castle {
        return if file_of(record.to) > file_of(record.from) {
            "O-O".to_owned()
        } else {
            "O-O-O".to_owned()
        };
    }

    let mut out = String::new();
    if record.moved_piece != PieceKind::Pawn {
        out.push(record.moved_piece.fen_char().to_ascii_uppercase());
    }
    if let Ok(destination) = square_to_algebraic(record.to) {
        out.push_str(&destination);
    }
    if let Some(kind) = record.promotion_piece {
        out.push('=');
        out.push(kind.fen_char().to_ascii_uppercase());
    }

    out
}

/// FEN of the position before the first recorded move.
fn initial_fen(game_state: &GameState) -> String {
    let mut rewound = game_state.clone();
    while undo_last_move(&mut rewound) {}
    rewound.get_fen()
}

fn result_token(game_state: &GameState) -> &'static str {
    if game_state.checkmate {
        match game_state.side_to_move {
            Color::Light => "0-1",
            Color::Dark => "1-0",
        }
    } else if game_state.stalemate {
        "1/2-1/2"
    } else {
        "*"
    }
}

fn escape_pgn_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_generation::legal_move_apply::{apply_promotion, attempt_move};
    use crate::utils::algebraic::algebraic_to_square;

    fn play(game_state: &mut GameState, moves: &[(&str, &str)]) {
        for (from, to) in moves {
            let from = algebraic_to_square(from).expect("test square should parse");
            let to = algebraic_to_square(to).expect("test square should parse");
            assert_eq!(attempt_move(game_state, from, to), MoveOutcome::Applied);
        }
    }

    #[test]
    fn fools_mate_export() {
        let mut game_state = GameState::new_game();
        play(
            &mut game_state,
            &[("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")],
        );

        let pgn = write_pgn(&game_state);
        assert!(pgn.contains("[Result \"0-1\"]"));
        assert!(pgn.contains("[Event \"Lampel Chess Game\"]"));
        assert!(!pgn.contains("[SetUp"));
        assert!(pgn.ends_with("1. f3 e5 2. g4 Qh4 0-1\n"));
    }

    #[test]
    fn date_header_is_pgn_formatted() {
        let pgn = write_pgn(&GameState::new_game());
        let date_line = pgn
            .lines()
            .find(|line| line.starts_with("[Date "))
            .expect("date header should be present");

        let value = &date_line[7..date_line.len() - 2];
        assert_eq!(value.len(), 10);
        assert_eq!(value.as_bytes()[4], b'.');
        assert_eq!(value.as_bytes()[7], b'.');
        assert!(pgn.ends_with("\n*\n"));
    }

    #[test]
    fn custom_start_adds_setup_and_numbers_dark_first_move() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 7";
        let mut game_state = GameState::from_fen(fen).expect("FEN should parse");
        play(&mut game_state, &[("e8", "c8"), ("e1", "g1")]);

        let mut headers = BTreeMap::new();
        headers.insert("White".to_owned(), "Ann \"The Rook\"".to_owned());
        let pgn = write_pgn_with_headers(&game_state, &headers);

        assert!(pgn.contains("[SetUp \"1\"]"));
        assert!(pgn.contains(&format!("[FEN \"{fen}\"]")));
        assert!(pgn.contains("[White \"Ann \\\"The Rook\\\"\"]"));
        assert!(pgn.ends_with("7... O-O-O 8. O-O *\n"));
    }

    #[test]
    fn promotion_suffix() {
        let mut game_state =
            GameState::from_fen("7k/P7/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        play(&mut game_state, &[("a7", "a8")]);
        apply_promotion(&mut game_state, PieceKind::Queen).expect("promotion should apply");

        let pgn = write_pgn(&game_state);
        assert!(pgn.contains("[FEN \"7k/P7/8/8/8/8/8/4K3 w - - 0 1\"]"));
        assert!(pgn.ends_with("1. a8=Q *\n"));
    }
}
