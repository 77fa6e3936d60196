//! Crate root module declarations for the Lampel Chess board core.
//!
//! Exposes the position model, the legality engine and move executor, the
//! notation codecs, the UCI analysis-engine client, and the board session API
//! consumed by front ends.

pub mod chess_errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
    pub mod undo_state;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_move_shared;
    pub mod legal_moves_king;
    pub mod perft;
}

pub mod uci {
    pub mod engine_config;
    pub mod engine_process;
    pub mod info_parser;
    pub mod uci_client;
}

pub mod session {
    pub mod analysis_driver;
    pub mod board_session;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod pgn;
    pub mod random_playout;
    pub mod render_game_state;
}
