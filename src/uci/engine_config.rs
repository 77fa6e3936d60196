use std::env;
use std::time::Duration;

pub const ENGINE_PATH_ENV: &str = "LAMPEL_ENGINE_PATH";

/// How to launch the analysis engine and how long to wait on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub path: String,
    pub args: Vec<String>,
    /// Window for `uciok` after `uci`.
    pub handshake_timeout: Duration,
    /// Window for `readyok` after `isready`.
    pub ready_timeout: Duration,
    /// How long one `get_best_lines` call may wait for output.
    pub poll_window: Duration,
    /// Wait after `quit` before the process is killed.
    pub stop_grace: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: "engines/stockfish".to_owned(),
            args: Vec::new(),
            handshake_timeout: Duration::from_millis(2000),
            ready_timeout: Duration::from_millis(1000),
            poll_window: Duration::from_millis(100),
            stop_grace: Duration::from_millis(100),
        }
    }
}

impl EngineConfig {
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Defaults, with the engine path taken from `LAMPEL_ENGINE_PATH` when set.
    pub fn from_env() -> Self {
        match env::var(ENGINE_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::with_path(path.trim()),
            _ => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EngineConfig;
    use std::time::Duration;

    #[test]
    fn defaults_match_analysis_timings() {
        let config = EngineConfig::default();
        assert_eq!(config.path, "engines/stockfish");
        assert!(config.args.is_empty());
        assert_eq!(config.handshake_timeout, Duration::from_millis(2000));
        assert_eq!(config.ready_timeout, Duration::from_millis(1000));
        assert_eq!(config.poll_window, Duration::from_millis(100));
    }

    #[test]
    fn with_path_keeps_default_timings() {
        let config = EngineConfig::with_path("/usr/bin/stockfish");
        assert_eq!(config.path, "/usr/bin/stockfish");
        assert_eq!(config.stop_grace, EngineConfig::default().stop_grace);
    }
}
