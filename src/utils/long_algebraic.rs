//! UCI long-algebraic move strings ("e2e4", "e7e8q").

use std::fmt;

use crate::chess_errors::ChessErrors;
use crate::game_state::{chess_types::*, undo_state::UndoState};
use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UciMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl UciMove {
    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }
}

/// Writes the move without validating it; use `format_uci_move` to reject
/// out-of-range squares or a non-promoting piece letter.
impl fmt::Display for UciMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for square in [self.from, self.to] {
            let file = char::from(b'a'.wrapping_add(file_of(square)));
            let rank = char::from(b'1'.wrapping_add(rank_of(square)));
            write!(f, "{file}{rank}")?;
        }
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.fen_char())?;
        }
        Ok(())
    }
}

/// Decode a 4 or 5 character UCI move. The promotion letter is
/// case-insensitive and must be one of `q`, `r`, `b`, `n`.
pub fn parse_uci_move(text: &str) -> Result<UciMove, ChessErrors> {
    let invalid = || ChessErrors::InvalidUciMove(text.to_owned());

    if !text.is_ascii() || !(4..=5).contains(&text.len()) {
        return Err(invalid());
    }

    let from = algebraic_to_square(&text[0..2]).map_err(|_| invalid())?;
    let to = algebraic_to_square(&text[2..4]).map_err(|_| invalid())?;

    let promotion = match text[4..].chars().next() {
        None => None,
        Some(ch) => match PieceKind::from_fen_char(ch) {
            Some(kind) if kind.is_promotion_target() => Some(kind),
            _ => return Err(invalid()),
        },
    };

    Ok(UciMove {
        from,
        to,
        promotion,
    })
}

/// Encode as lowercase square pair plus optional lowercase promotion letter.
pub fn format_uci_move(mv: &UciMove) -> Result<String, ChessErrors> {
    let mut out = String::with_capacity(5);
    out.push_str(&square_to_algebraic(mv.from)?);
    out.push_str(&square_to_algebraic(mv.to)?);

    if let Some(kind) = mv.promotion {
        if !kind.is_promotion_target() {
            return Err(ChessErrors::InvalidPromotionPiece(kind.fen_char()));
        }
        out.push(kind.fen_char());
    }

    Ok(out)
}

/// UCI form of a history record, including its promotion choice.
pub fn record_to_uci(record: &UndoState) -> Result<String, ChessErrors> {
    format_uci_move(&UciMove {
        from: record.from,
        to: record.to,
        promotion: record.promotion_piece,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::game_state::GameState;
    use crate::move_generation::legal_move_apply::{apply_promotion, attempt_move};

    #[test]
    fn parses_plain_and_promotion_moves() {
        let mv = parse_uci_move("e2e4").expect("e2e4 should parse");
        assert_eq!(mv, UciMove::new(12, 28));

        let mv = parse_uci_move("a7a8Q").expect("a7a8Q should parse");
        assert_eq!(mv.promotion, Some(PieceKind::Queen));
        assert_eq!(mv.to_string(), "a7a8q");
    }

    #[test]
    fn rejects_malformed_strings() {
        for bad in ["", "e2", "e2e", "e2e4qq", "i2e4", "e9e4", "e7e8k", "e7e8x", "e2é4"] {
            assert_eq!(
                parse_uci_move(bad),
                Err(ChessErrors::InvalidUciMove(bad.to_owned())),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn formats_records_from_history() {
        let mut game_state =
            GameState::from_fen("7k/P7/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        assert_eq!(attempt_move(&mut game_state, 48, 56), MoveOutcome::Applied);
        let record = game_state.last_move().expect("move should be recorded");
        assert_eq!(record_to_uci(record).expect("record should format"), "a7a8");

        apply_promotion(&mut game_state, PieceKind::Knight).expect("promotion should apply");
        let record = game_state.last_move().expect("move should be recorded");
        assert_eq!(record_to_uci(record).expect("record should format"), "a7a8n");
    }

    #[test]
    fn format_rejects_bad_promotion_kind() {
        let mv = UciMove {
            from: 52,
            to: 60,
            promotion: Some(PieceKind::King),
        };
        assert_eq!(
            format_uci_move(&mv),
            Err(ChessErrors::InvalidPromotionPiece('k'))
        );
    }

    #[test]
    fn display_never_fails_on_unchecked_fields() {
        let mv = UciMove {
            from: 52,
            to: 60,
            promotion: Some(PieceKind::King),
        };
        assert_eq!(mv.to_string(), "e7e8k");
        assert_eq!(UciMove::new(0, 63).to_string(), "a1h8");
        assert_eq!(format!("{}", UciMove::new(64, 12)), "a9e2");
    }
}
