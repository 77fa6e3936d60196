use std::io::{self, BufRead, Write};

use log::{Level, LevelFilter, Log, Metadata, Record};

use lampel_chess::game_state::chess_types::{Color, MoveOutcome, PieceKind};
use lampel_chess::move_generation::perft::perft;
use lampel_chess::session::analysis_driver::{AnalysisConfig, AnalysisDriver};
use lampel_chess::session::board_session::BoardSession;
use lampel_chess::uci::engine_config::EngineConfig;
use lampel_chess::utils::algebraic::square_to_display;
use lampel_chess::utils::render_game_state::render_game_state;

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

const HELP: &str = "commands: move <uci> | drag <from> <to> | undo | promote <q|r|b|n> | fen | load <fen> | board | pgn | perft <depth> | reset | analyse | lines | stop | quit";

fn main() -> io::Result<()> {
    let verbose = std::env::args()
        .skip(1)
        .any(|arg| arg == "--verbose" || arg == "-v");
    if verbose && log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut session = BoardSession::new();
    let mut analysis: Option<AnalysisDriver> = None;

    writeln!(stdout, "{HELP}")?;
    writeln!(stdout, "{}", render_game_state(session.game_state()))?;

    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let (cmd, rest) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
        let rest = rest.trim();

        match cmd {
            "move" => {
                if session.apply_uci_move(rest) {
                    writeln!(stdout, "{}", render_game_state(session.game_state()))?;
                    write_status(&mut stdout, &session)?;
                } else {
                    writeln!(stdout, "illegal move: {rest}")?;
                }
            }
            "drag" => {
                let (from, to) = rest.split_once(' ').unwrap_or((rest, ""));
                if !session.click(from) {
                    writeln!(stdout, "no piece to pick up on '{from}'")?;
                } else if let Some(outcome) = session.release(to.trim()) {
                    writeln!(stdout, "{}", outcome_label(outcome))?;
                } else {
                    writeln!(stdout, "move cancelled")?;
                }
            }
            "undo" => {
                if !session.undo() {
                    writeln!(stdout, "nothing to undo")?;
                }
            }
            "promote" => {
                let kind = rest.chars().next().and_then(PieceKind::from_fen_char);
                match kind {
                    Some(kind) if session.promote_last_move(kind) => {
                        write_status(&mut stdout, &session)?
                    }
                    _ => writeln!(stdout, "cannot promote with '{rest}'")?,
                }
            }
            "fen" => writeln!(stdout, "{}", session.export_fen())?,
            "load" => {
                if !session.load_fen(rest) {
                    writeln!(stdout, "invalid FEN")?;
                }
            }
            "board" => {
                writeln!(stdout, "{}", render_game_state(session.game_state()))?;
                write_status(&mut stdout, &session)?;
            }
            "pgn" => write!(stdout, "{}", session.export_pgn())?,
            "perft" => match rest.parse::<u8>() {
                Ok(depth) => {
                    let mut state = session.game_state().clone();
                    let counts = perft(&mut state, depth);
                    writeln!(stdout, "{counts:?}")?;
                }
                Err(_) => writeln!(stdout, "usage: perft <depth>")?,
            },
            "reset" => session.reset(),
            "analyse" => {
                let driver = analysis.get_or_insert_with(|| {
                    AnalysisDriver::start(EngineConfig::from_env(), AnalysisConfig::default())
                });
                if driver.is_available() {
                    driver.update(&session);
                    writeln!(stdout, "analysing {}", session.export_fen())?;
                } else {
                    writeln!(stdout, "analysis engine unavailable")?;
                }
            }
            "lines" => match analysis.as_mut() {
                Some(driver) if driver.is_available() => {
                    driver.update(&session);
                    for (rank, engine_line) in driver.lines().iter().enumerate() {
                        let score = if engine_line.mate != 0 {
                            format!("mate {}", engine_line.mate)
                        } else {
                            format!("{:+.2}", f64::from(engine_line.score_cp) / 100.0)
                        };
                        writeln!(
                            stdout,
                            "{}. [{}] depth {} {}",
                            rank + 1,
                            score,
                            engine_line.depth,
                            engine_line.pv.join(" ")
                        )?;
                    }
                }
                _ => writeln!(stdout, "no analysis running")?,
            },
            "stop" => {
                if let Some(driver) = analysis.as_mut() {
                    driver.stop();
                }
            }
            "quit" => break,
            _ => writeln!(stdout, "{HELP}")?,
        }

        stdout.flush()?;
    }

    Ok(())
}

fn write_status(out: &mut impl Write, session: &BoardSession) -> io::Result<()> {
    let side = match session.side_to_move() {
        Color::Light => "White",
        Color::Dark => "Black",
    };

    if session.is_checkmate() {
        writeln!(out, "checkmate, {side} has no moves")?;
    } else if session.is_stalemate() {
        writeln!(out, "stalemate")?;
    } else if session.is_in_check() {
        writeln!(out, "{side} to move, in check")?;
    } else {
        writeln!(out, "{side} to move")?;
    }

    if session.needs_promotion() {
        if let Some(last) = session.game_state().last_move() {
            let square = square_to_display(last.to).unwrap_or_default();
            writeln!(out, "pawn on {square} awaits promotion")?;
        }
    }

    Ok(())
}

fn outcome_label(outcome: MoveOutcome) -> &'static str {
    match outcome {
        MoveOutcome::Applied => "applied",
        MoveOutcome::Illegal => "illegal",
        MoveOutcome::CausesSelfCheck => "leaves king in check",
    }
}
