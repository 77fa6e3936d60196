use crate::game_state::{chess_types::*, game_state::GameState};

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Signed (file, rank) displacement from `from` to `to`.
#[inline]
pub fn square_delta(from: Square, to: Square) -> (i8, i8) {
    (
        file_of(to) as i8 - file_of(from) as i8,
        rank_of(to) as i8 - rank_of(from) as i8,
    )
}

#[inline]
pub fn is_straight_line(d_file: i8, d_rank: i8) -> bool {
    (d_file == 0) != (d_rank == 0)
}

#[inline]
pub fn is_diagonal(d_file: i8, d_rank: i8) -> bool {
    d_file != 0 && d_file.abs() == d_rank.abs()
}

#[inline]
pub fn is_knight_jump(d_file: i8, d_rank: i8) -> bool {
    matches!((d_file.abs(), d_rank.abs()), (1, 2) | (2, 1))
}

#[inline]
pub fn is_king_step(d_file: i8, d_rank: i8) -> bool {
    d_file.abs() <= 1 && d_rank.abs() <= 1 && (d_file, d_rank) != (0, 0)
}

/// True if every square strictly between `from` and `to` is unoccupied.
///
/// Only meaningful for straight or diagonal lines; any other geometry is
/// reported as blocked.
pub fn is_path_clear(game_state: &GameState, from: Square, to: Square) -> bool {
    let (d_file, d_rank) = square_delta(from, to);
    if !is_straight_line(d_file, d_rank) && !is_diagonal(d_file, d_rank) {
        return false;
    }

    let step = (d_file.signum(), d_rank.signum());
    let mut current = from;
    loop {
        let Some(next) = offset_square(current, step.0, step.1) else {
            return false;
        };
        if next == to {
            return true;
        }
        if !game_state.is_empty(next) {
            return false;
        }
        current = next;
    }
}

#[inline]
pub fn enemy_piece_on(game_state: &GameState, color: Color, square: Square) -> Option<PieceId> {
    game_state
        .piece_id_at(square)
        .filter(|id| game_state.pieces[*id].color != color)
}
