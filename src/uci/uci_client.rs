//! Client side of the UCI protocol for an external analysis engine.
//!
//! The client owns one engine process. Commands are written immediately;
//! output is only consumed when the caller polls `get_best_lines`, which
//! waits at most `EngineConfig::poll_window` per call. Streamed `info`
//! records are folded into a ranking keyed by their `multipv` index, so the
//! latest record for each rank wins.
//!
//! A failed spawn or a missing handshake token leaves the client `Stopped`;
//! every analysis call on a stopped client is a harmless no-op.

use std::collections::BTreeMap;

use log::{debug, info, warn};

use crate::chess_errors::EngineErrors;
use crate::uci::engine_config::EngineConfig;
use crate::uci::engine_process::EngineProcess;
use crate::uci::info_parser::{parse_bestmove_line, parse_info_line, EngineLine};

pub const MAX_SKILL_LEVEL: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Starting,
    AwaitingHandshake,
    Ready,
    Analyzing,
    Stopped,
}

pub struct EngineClient {
    config: EngineConfig,
    process: Option<EngineProcess>,
    state: EngineState,
    ranking: BTreeMap<u32, EngineLine>,
    last_bestmove: Option<String>,
    /// Searches that were stopped but whose `bestmove` has not been read.
    stale_searches: u32,
    multipv: u32,
}

impl EngineClient {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            process: None,
            state: EngineState::Uninitialized,
            ranking: BTreeMap::new(),
            last_bestmove: None,
            stale_searches: 0,
            multipv: 1,
        }
    }

    #[inline]
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// True when analysis commands will be sent.
    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self.state, EngineState::Ready | EngineState::Analyzing)
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Spawn the engine and run the `uci`/`uciok`, `isready`/`readyok`
    /// handshake, each under its own timeout.
    ///
    /// There is no retry: on failure the client is `Stopped` for good.
    pub fn initialize(&mut self) -> Result<(), EngineErrors> {
        match self.state {
            EngineState::Uninitialized => {}
            EngineState::Ready | EngineState::Analyzing => return Ok(()),
            _ => return Err(EngineErrors::NotReady),
        }

        match self.run_handshake() {
            Ok(()) => {
                self.state = EngineState::Ready;
                info!("engine '{}' is ready", self.config.path);
                Ok(())
            }
            Err(e) => {
                warn!("engine '{}' unavailable: {e}", self.config.path);
                self.shutdown();
                Err(e)
            }
        }
    }

    fn run_handshake(&mut self) -> Result<(), EngineErrors> {
        self.state = EngineState::Starting;
        let mut process = EngineProcess::spawn(&self.config)?;

        self.state = EngineState::AwaitingHandshake;
        process.write_line("uci")?;
        process.wait_for_token("uciok", self.config.handshake_timeout)?;
        process.write_line("isready")?;
        process.wait_for_token("readyok", self.config.ready_timeout)?;

        self.process = Some(process);
        Ok(())
    }

    /// Push a position. Ignored unless the client is ready; an ongoing
    /// search is stopped first.
    pub fn send_position(&mut self, fen: &str) -> bool {
        if self.state == EngineState::Analyzing {
            self.stop_analysis();
        }
        if self.state != EngineState::Ready {
            return false;
        }

        self.ranking.clear();
        self.last_bestmove = None;
        self.send(&format!("position fen {fen}"))
    }

    /// Configure `line_count` ranked lines and start a depth-limited search.
    /// Returns without waiting for results.
    pub fn start_analysis(&mut self, depth: u32, line_count: u32) -> bool {
        if self.state == EngineState::Analyzing {
            self.stop_analysis();
        }
        if self.state != EngineState::Ready {
            return false;
        }

        if !self.set_multipv(line_count) {
            return false;
        }
        self.ranking.clear();
        self.last_bestmove = None;
        if !self.send(&format!("go depth {}", depth.max(1))) {
            return false;
        }

        self.state = EngineState::Analyzing;
        debug!("analysis started: depth {depth}, {} lines", self.multipv);
        true
    }

    /// Drain output that arrives within the poll window and return up to
    /// `count` lines ordered by rank.
    pub fn get_best_lines(&mut self, count: usize) -> Vec<EngineLine> {
        if self.is_ready() {
            self.poll();
        }
        self.ranking.values().take(count).cloned().collect()
    }

    fn poll(&mut self) {
        let window = self.config.poll_window;
        let Some(process) = self.process.as_mut() else {
            return;
        };

        let lines = process.read_lines_for(window);
        let disconnected = process.is_disconnected();

        for line in lines {
            if let Some(best) = parse_bestmove_line(&line) {
                if self.stale_searches > 0 {
                    self.stale_searches -= 1;
                    continue;
                }
                debug!("engine bestmove {best}");
                self.last_bestmove = Some(best);
                if self.state == EngineState::Analyzing {
                    self.state = EngineState::Ready;
                }
            } else if self.stale_searches == 0 {
                if let Some(parsed) = parse_info_line(&line) {
                    self.ranking.insert(parsed.multipv, parsed);
                }
            }
        }

        if disconnected {
            warn!("engine '{}' closed its output", self.config.path);
            self.shutdown();
        }
    }

    /// Ask the engine to stop searching. Output may keep arriving briefly;
    /// records from the stopped search are discarded.
    pub fn stop_analysis(&mut self) -> bool {
        if self.state != EngineState::Analyzing {
            return false;
        }
        if !self.send("stop") {
            return false;
        }
        self.stale_searches += 1;
        self.state = EngineState::Ready;
        true
    }

    /// Engine strength, clamped to `0..=20`.
    pub fn set_skill_level(&mut self, level: u8) -> bool {
        self.set_option("Skill Level", level.min(MAX_SKILL_LEVEL))
    }

    pub fn set_threads(&mut self, threads: u32) -> bool {
        self.set_option("Threads", threads.max(1))
    }

    pub fn set_multipv(&mut self, lines: u32) -> bool {
        let lines = lines.max(1);
        if self.set_option("MultiPV", lines) {
            self.multipv = lines;
            true
        } else {
            false
        }
    }

    fn set_option(&mut self, name: &str, value: impl std::fmt::Display) -> bool {
        if self.state != EngineState::Ready {
            return false;
        }
        self.send(&setoption_command(name, value))
    }

    /// Centipawn score of the top line, mates mapped to `±MATE_SCORE`.
    pub fn evaluation(&self) -> Option<i32> {
        self.ranking.values().next().map(EngineLine::evaluation)
    }

    /// First move of the top line, or the last `bestmove` if no line is known.
    pub fn best_move(&self) -> Option<String> {
        self.ranking
            .values()
            .next()
            .and_then(|line| line.first_move().map(str::to_owned))
            .or_else(|| self.last_bestmove.clone())
    }

    pub fn last_bestmove(&self) -> Option<&str> {
        self.last_bestmove.as_deref()
    }

    /// Quit, then kill and reap the engine. Idempotent.
    pub fn shutdown(&mut self) {
        if let Some(mut process) = self.process.take() {
            process.shutdown(self.config.stop_grace);
            info!("engine '{}' shut down", self.config.path);
        }
        self.state = EngineState::Stopped;
    }

    fn send(&mut self, command: &str) -> bool {
        let Some(process) = self.process.as_mut() else {
            return false;
        };
        match process.write_line(command) {
            Ok(()) => true,
            Err(e) => {
                warn!("engine write failed for '{command}': {e}");
                self.shutdown();
                false
            }
        }
    }
}

impl Drop for EngineClient {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn setoption_command(name: &str, value: impl std::fmt::Display) -> String {
    format!("setoption name {name} value {value}")
}
