//! FEN-to-GameState parser.
//!
//! Builds a fresh piece arena and the rights/clock fields from a
//! Forsyth-Edwards Notation string. Status flags (check, mate, stalemate) are
//! left for `GameState::from_fen` to compute.

use crate::chess_errors::ChessErrors;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> Result<GameState, ChessErrors> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    if fields.len() != 6 {
        return Err(ChessErrors::InvalidFen(format!(
            "expected 6 fields, found {}",
            fields.len()
        )));
    }

    let mut game_state = GameState::new_empty();

    parse_board(fields[0], &mut game_state)?;
    game_state.side_to_move = parse_side_to_move(fields[1])?;
    game_state.castling_rights = parse_castling_rights(fields[2])?;
    game_state.en_passant_square = parse_en_passant_square(fields[3], game_state.side_to_move)?;
    game_state.halfmove_clock = fields[4]
        .parse::<u16>()
        .map_err(|_| ChessErrors::InvalidFen(format!("invalid halfmove clock: {}", fields[4])))?;
    game_state.fullmove_number = fields[5]
        .parse::<u16>()
        .map_err(|_| ChessErrors::InvalidFen(format!("invalid fullmove number: {}", fields[5])))?;

    Ok(game_state)
}

fn parse_board(board_part: &str, game_state: &mut GameState) -> Result<(), ChessErrors> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(ChessErrors::InvalidFen(
            "board layout must contain 8 ranks".to_owned(),
        ));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = (7 - fen_rank_idx) as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(ChessErrors::InvalidFen(format!(
                        "invalid empty-square count '{ch}'"
                    )));
                }
                file += empty_count as u8;
                if file > 8 {
                    return Err(ChessErrors::InvalidFen(format!(
                        "rank {} has too many files",
                        board_rank + 1
                    )));
                }
                continue;
            }

            let kind = PieceKind::from_fen_char(ch).ok_or_else(|| {
                ChessErrors::InvalidFen(format!("invalid piece character '{ch}'"))
            })?;
            let color = if ch.is_ascii_uppercase() {
                Color::Light
            } else {
                Color::Dark
            };

            if file >= 8 {
                return Err(ChessErrors::InvalidFen(format!(
                    "rank {} has too many files",
                    board_rank + 1
                )));
            }

            game_state.add_piece(Piece::new(kind, color, make_square(file, board_rank)));
            file += 1;
        }

        if file != 8 {
            return Err(ChessErrors::InvalidFen(format!(
                "rank {} does not sum to 8 files",
                board_rank + 1
            )));
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> Result<Color, ChessErrors> {
    match side_part {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        _ => Err(ChessErrors::InvalidFen(format!(
            "invalid side-to-move field: {side_part}"
        ))),
    }
}

fn parse_castling_rights(castling_part: &str) -> Result<CastlingRights, ChessErrors> {
    if castling_part == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;

    for ch in castling_part.chars() {
        match ch {
            'K' => rights |= CASTLE_LIGHT_KINGSIDE,
            'Q' => rights |= CASTLE_LIGHT_QUEENSIDE,
            'k' => rights |= CASTLE_DARK_KINGSIDE,
            'q' => rights |= CASTLE_DARK_QUEENSIDE,
            _ => {
                return Err(ChessErrors::InvalidFen(format!(
                    "invalid castling rights character: {ch}"
                )))
            }
        }
    }

    Ok(rights)
}

/// The target must sit behind a pawn that just advanced two squares: rank 6
/// when Light is to move, rank 3 when Dark is.
fn parse_en_passant_square(
    en_passant_part: &str,
    side_to_move: Color,
) -> Result<Option<Square>, ChessErrors> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let invalid = || ChessErrors::InvalidFen(format!("invalid en-passant square: {en_passant_part}"));
    let square = algebraic_to_square(en_passant_part).map_err(|_| invalid())?;
    let expected_rank = match side_to_move {
        Color::Light => 5,
        Color::Dark => 2,
    };
    if rank_of(square) != expected_rank {
        return Err(invalid());
    }

    Ok(Some(square))
}

#[cfg(test)]
mod tests {
    use super::parse_fen;
    use crate::chess_errors::ChessErrors;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::{Color, PieceKind, CASTLE_ALL, CASTLE_DARK_KINGSIDE};
    use crate::utils::algebraic::algebraic_to_square;
    use crate::utils::render_game_state::render_game_state;

    #[test]
    fn parse_starting_fen_and_render_board() {
        let game_state = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");

        println!("\n{}", render_game_state(&game_state));

        assert_eq!(game_state.pieces.len(), 32);
        assert_eq!(game_state.side_to_move, Color::Light);
        assert_eq!(game_state.castling_rights, CASTLE_ALL);
        assert_eq!(game_state.en_passant_square, None);
        assert_eq!(game_state.fullmove_number, 1);
        assert_eq!(game_state.halfmove_clock, 0);
    }

    #[test]
    fn parse_places_pieces_rank_eight_first() {
        let game_state =
            parse_fen("r3k3/8/8/8/4p3/8/8/4K2R b k e3 3 17").expect("FEN should parse");

        let a8 = algebraic_to_square("a8").expect("a8 should parse");
        let rook = game_state.piece_at(a8).expect("rook should stand on a8");
        assert_eq!((rook.kind, rook.color), (PieceKind::Rook, Color::Dark));

        let h1 = algebraic_to_square("h1").expect("h1 should parse");
        let rook = game_state.piece_at(h1).expect("rook should stand on h1");
        assert_eq!((rook.kind, rook.color), (PieceKind::Rook, Color::Light));

        assert_eq!(game_state.side_to_move, Color::Dark);
        assert_eq!(game_state.castling_rights, CASTLE_DARK_KINGSIDE);
        assert_eq!(game_state.en_passant_square, algebraic_to_square("e3").ok());
        assert_eq!(game_state.halfmove_clock, 3);
        assert_eq!(game_state.fullmove_number, 17);
    }

    #[test]
    fn rejects_malformed_fields() {
        let bad = [
            "8/8/8/8/8/8/8/8 w - - 0",
            "8/8/8/8/8/8/8/8 w - - 0 1 extra",
            "8/8/8/8/8/8/8 w - - 0 1",
            "9/8/8/8/8/8/8/8 w - - 0 1",
            "8/8/8/8/8/8/8/7 w - - 0 1",
            "8/8/8/8/8/8/8/44K w - - 0 1",
            "8/8/8/8/8/8/8/4X3 w - - 0 1",
            "8/8/8/8/8/8/8/8 x - - 0 1",
            "8/8/8/8/8/8/8/8 w KX - 0 1",
            "8/8/8/8/8/8/8/8 w - z9 0 1",
            "4k3/8/8/8/8/8/3P4/4K3 w - e3 0 1",
            "4k3/8/8/8/8/8/8/4K3 b - e6 0 1",
            "4k3/8/8/8/8/8/8/4K3 w - e4 0 1",
            "8/8/8/8/8/8/8/8 w - - a 1",
            "8/8/8/8/8/8/8/8 w - - 0 -1",
        ];

        for fen in bad {
            assert!(
                matches!(parse_fen(fen), Err(ChessErrors::InvalidFen(_))),
                "FEN should be rejected: {fen}"
            );
        }
    }
}
