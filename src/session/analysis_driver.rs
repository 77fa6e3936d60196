//! Keeps engine analysis in step with a `BoardSession`.
//!
//! Call `update` from the main loop. A new search starts whenever the
//! position's FEN changes; results are polled no more often than
//! `AnalysisConfig::poll_interval`.

use std::time::{Duration, Instant};

use log::{debug, info};

use crate::game_state::chess_types::Square;
use crate::session::board_session::BoardSession;
use crate::uci::engine_config::EngineConfig;
use crate::uci::info_parser::EngineLine;
use crate::uci::uci_client::EngineClient;
use crate::utils::long_algebraic::parse_uci_move;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub depth: u32,
    pub line_count: u32,
    pub poll_interval: Duration,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            depth: 15,
            line_count: 3,
            poll_interval: Duration::from_millis(500),
        }
    }
}

pub struct AnalysisDriver {
    client: EngineClient,
    config: AnalysisConfig,
    analysed_fen: Option<String>,
    last_poll: Option<Instant>,
    lines: Vec<EngineLine>,
}

impl AnalysisDriver {
    /// Wrap a client; the client is not initialized here.
    pub fn new(client: EngineClient, config: AnalysisConfig) -> Self {
        Self {
            client,
            config,
            analysed_fen: None,
            last_poll: None,
            lines: Vec::new(),
        }
    }

    /// Spawn and handshake the engine. Failure only disables analysis.
    pub fn start(engine: EngineConfig, config: AnalysisConfig) -> Self {
        let mut client = EngineClient::new(engine);
        if let Err(e) = client.initialize() {
            info!("analysis disabled: {e}");
        }
        Self::new(client, config)
    }

    #[inline]
    pub fn is_available(&self) -> bool {
        self.client.is_ready()
    }

    #[inline]
    pub fn client_mut(&mut self) -> &mut EngineClient {
        &mut self.client
    }

    #[inline]
    pub fn lines(&self) -> &[EngineLine] {
        &self.lines
    }

    pub fn update(&mut self, session: &BoardSession) -> bool {
        self.update_at(session, Instant::now())
    }

    /// Restart analysis if the position changed, then poll if due.
    /// Returns `true` when `lines` was refreshed.
    ///
    /// While a pawn waits on its last rank for promotion the position is not
    /// a legal one, so analysis is suspended until the piece is chosen.
    pub fn update_at(&mut self, session: &BoardSession, now: Instant) -> bool {
        if !self.is_available() {
            return false;
        }

        if session.needs_promotion() {
            if self.analysed_fen.take().is_some() {
                debug!("analysis suspended until promotion");
            }
            self.client.stop_analysis();
            self.lines.clear();
            self.last_poll = None;
            return false;
        }

        let fen = session.export_fen();
        if self.analysed_fen.as_deref() != Some(fen.as_str()) {
            self.lines.clear();
            self.last_poll = None;

            if session.is_checkmate() || session.is_stalemate() {
                self.client.stop_analysis();
            } else if self.client.send_position(&fen)
                && self
                    .client
                    .start_analysis(self.config.depth, self.config.line_count)
            {
                debug!("analysing {fen}");
            }
            self.analysed_fen = Some(fen);
        }

        let due = self
            .last_poll
            .map_or(true, |last| now.duration_since(last) >= self.config.poll_interval);
        if !due {
            return false;
        }

        self.last_poll = Some(now);
        self.lines = self.client.get_best_lines(self.config.line_count as usize);
        true
    }

    /// Evaluation of the top line in centipawns from the side to move.
    pub fn evaluation(&self) -> Option<i32> {
        self.lines.first().map(EngineLine::evaluation)
    }

    /// First move of every line as (from, to), best line first.
    pub fn arrows(&self) -> Vec<(Square, Square)> {
        self.lines
            .iter()
            .filter_map(|line| line.first_move())
            .filter_map(|uci| parse_uci_move(uci).ok())
            .map(|mv| (mv.from, mv.to))
            .collect()
    }

    pub fn stop(&mut self) -> bool {
        self.client.stop_analysis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::{MoveOutcome, PieceKind};

    #[test]
    fn unavailable_engine_is_silent() {
        let mut driver = AnalysisDriver::start(
            EngineConfig::with_path("/nonexistent/engine-binary"),
            AnalysisConfig::default(),
        );
        let session = BoardSession::new();

        assert!(!driver.is_available());
        assert!(!driver.update(&session));
        assert!(driver.lines().is_empty());
        assert_eq!(driver.evaluation(), None);
        assert!(driver.arrows().is_empty());
        assert!(!driver.stop());
    }

    #[cfg(unix)]
    #[test]
    fn reanalyses_on_position_change_and_throttles_polls() {
        let script = "while read -r cmd rest; do case \"$cmd\" in \
             uci) echo uciok ;; isready) echo readyok ;; \
             go) echo 'info depth 8 multipv 1 score cp 25 pv e2e4 e7e5'; \
                 echo 'info depth 8 multipv 2 score cp 15 pv g1f3'; echo 'bestmove e2e4' ;; \
             quit) exit 0 ;; esac; done";
        let engine = EngineConfig {
            path: "/bin/sh".to_owned(),
            args: vec!["-c".to_owned(), script.to_owned()],
            poll_window: Duration::from_millis(50),
            ..EngineConfig::default()
        };
        let config = AnalysisConfig {
            depth: 8,
            line_count: 2,
            poll_interval: Duration::from_millis(500),
        };
        let mut driver = AnalysisDriver::start(engine, config);
        assert!(driver.is_available());

        let mut session = BoardSession::new();
        let start = Instant::now();
        assert!(driver.update_at(&session, start));
        assert!(!driver.update_at(&session, start + Duration::from_millis(100)));

        let mut tick = start;
        for _ in 0..60 {
            if driver.lines().len() == 2 {
                break;
            }
            tick += Duration::from_millis(500);
            driver.update_at(&session, tick);
        }

        assert_eq!(driver.lines().len(), 2);
        assert_eq!(driver.evaluation(), Some(25));
        assert_eq!(driver.arrows(), vec![(12, 28), (6, 21)]);

        // A move changes the FEN: lines reset and the next poll runs at once.
        assert!(session.apply_uci_move("e2e4"));
        assert!(driver.update_at(&session, tick));
        assert!(driver.lines().len() <= 2);

        driver.client_mut().shutdown();
        assert!(!driver.update_at(&session, tick + Duration::from_secs(1)));
    }

    #[cfg(unix)]
    #[test]
    fn pending_promotion_is_never_sent_to_the_engine() {
        let log_path = std::env::temp_dir().join(format!(
            "lampel_chess_promotion_{}.log",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&log_path);

        let script = format!(
            "while read -r cmd rest; do echo \"$cmd $rest\" >> '{}'; case \"$cmd\" in \
             uci) echo uciok ;; isready) echo readyok ;; \
             go) echo 'info depth 5 multipv 1 score cp -900 pv h8g7'; echo 'bestmove h8g7' ;; \
             quit) exit 0 ;; esac; done",
            log_path.display()
        );
        let engine = EngineConfig {
            path: "/bin/sh".to_owned(),
            args: vec!["-c".to_owned(), script],
            poll_window: Duration::from_millis(50),
            ..EngineConfig::default()
        };
        let config = AnalysisConfig {
            depth: 5,
            line_count: 1,
            poll_interval: Duration::from_millis(100),
        };
        let mut driver = AnalysisDriver::start(engine, config);
        assert!(driver.is_available());

        let mut session =
            BoardSession::from_fen("7k/P7/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should load");
        let mut tick = Instant::now();
        driver.update_at(&session, tick);

        assert!(session.click("a7"));
        assert_eq!(session.release("a8"), Some(MoveOutcome::Applied));
        assert!(session.needs_promotion());
        for _ in 0..3 {
            tick += Duration::from_millis(200);
            assert!(!driver.update_at(&session, tick));
            assert!(driver.lines().is_empty());
        }

        assert!(session.promote_last_move(PieceKind::Queen));
        for _ in 0..60 {
            tick += Duration::from_millis(200);
            driver.update_at(&session, tick);
            if !driver.lines().is_empty() {
                break;
            }
        }
        assert_eq!(driver.evaluation(), Some(-900));
        driver.client_mut().shutdown();

        let log = std::fs::read_to_string(&log_path).expect("engine log should exist");
        let _ = std::fs::remove_file(&log_path);
        let positions: Vec<&str> = log
            .lines()
            .filter(|line| line.starts_with("position"))
            .collect();
        assert_eq!(
            positions,
            vec![
                "position fen 7k/P7/8/8/8/8/8/4K3 w - - 0 1",
                "position fen Q6k/8/8/8/8/8/8/4K3 b - - 0 1",
            ]
        );
    }
}
