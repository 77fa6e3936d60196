//! Child-process plumbing for a line-oriented engine.
//!
//! stdout is drained by a reader thread that forwards complete lines over a
//! channel, so every read on this side is bounded by a timeout.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, trace, warn};

use crate::chess_errors::EngineErrors;
use crate::uci::engine_config::EngineConfig;

pub struct EngineProcess {
    child: Child,
    stdin: Option<ChildStdin>,
    lines: Receiver<String>,
    disconnected: bool,
    stopped: bool,
}

impl EngineProcess {
    pub fn spawn(config: &EngineConfig) -> Result<Self, EngineErrors> {
        let mut child = Command::new(&config.path)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| EngineErrors::Spawn {
                path: config.path.clone(),
                source,
            })?;

        let Some(stdin) = child.stdin.take() else {
            reap(&mut child);
            return Err(EngineErrors::MissingPipe("stdin"));
        };
        let Some(stdout) = child.stdout.take() else {
            reap(&mut child);
            return Err(EngineErrors::MissingPipe("stdout"));
        };

        let (line_tx, line_rx) = channel::<String>();
        thread::spawn(move || {
            let reader = BufReader::new(stdout);
            for line in reader.lines() {
                let Ok(line) = line else {
                    break;
                };
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if line_tx.send(trimmed.to_owned()).is_err() {
                    break;
                }
            }
        });

        debug!("spawned engine '{}' (pid {})", config.path, child.id());

        Ok(Self {
            child,
            stdin: Some(stdin),
            lines: line_rx,
            disconnected: false,
            stopped: false,
        })
    }

    /// Write one command line and flush it.
    pub fn write_line(&mut self, command: &str) -> Result<(), EngineErrors> {
        let stdin = self.stdin.as_mut().ok_or(EngineErrors::MissingPipe("stdin"))?;
        trace!("> {command}");
        writeln!(stdin, "{command}")?;
        stdin.flush()?;
        Ok(())
    }

    /// Collect lines that arrive within `window`.
    ///
    /// Returns early once the engine closed its stdout.
    pub fn read_lines_for(&mut self, window: Duration) -> Vec<String> {
        let deadline = Instant::now() + window;
        let mut out = Vec::new();

        while !self.disconnected {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            match self.lines.recv_timeout(deadline - now) {
                Ok(line) => {
                    trace!("< {line}");
                    out.push(line);
                }
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => self.disconnected = true,
            }
        }

        out
    }

    /// Discard lines until one starts with `token`.
    pub fn wait_for_token(&mut self, token: &'static str, timeout: Duration) -> Result<(), EngineErrors> {
        let started = Instant::now();
        let deadline = started + timeout;

        while !self.disconnected {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            match self.lines.recv_timeout(deadline - now) {
                Ok(line) => {
                    trace!("< {line}");
                    if line.starts_with(token) {
                        return Ok(());
                    }
                }
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => self.disconnected = true,
            }
        }

        Err(EngineErrors::HandshakeTimeout {
            token,
            waited_ms: started.elapsed().as_millis(),
        })
    }

    /// True once the engine closed its stdout.
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    /// Send `quit`, give the engine `grace` to exit, then kill and reap it.
    ///
    /// Safe to call more than once and after the process already exited.
    pub fn shutdown(&mut self, grace: Duration) {
        if self.stopped {
            return;
        }
        self.stopped = true;

        if self.write_line("quit").is_err() {
            debug!("engine stdin already closed before quit");
        }
        // Closing stdin lets engines that ignore quit see EOF.
        self.stdin = None;

        let deadline = Instant::now() + grace;
        loop {
            match self.child.try_wait() {
                Ok(Some(status)) => {
                    debug!("engine exited with {status}");
                    return;
                }
                Ok(None) if Instant::now() < deadline => thread::sleep(Duration::from_millis(5)),
                Ok(None) => break,
                Err(e) => {
                    warn!("failed to poll engine process: {e}");
                    break;
                }
            }
        }

        reap(&mut self.child);
    }
}

impl Drop for EngineProcess {
    fn drop(&mut self) {
        self.shutdown(Duration::ZERO);
    }
}

fn reap(child: &mut Child) {
    if let Err(e) = child.kill() {
        debug!("engine kill skipped: {e}");
    }
    if let Err(e) = child.wait() {
        warn!("failed to reap engine process: {e}");
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn shell(script: &str) -> EngineConfig {
        EngineConfig {
            path: "/bin/sh".to_owned(),
            args: vec!["-c".to_owned(), script.to_owned()],
            ..EngineConfig::default()
        }
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let config = EngineConfig::with_path("/nonexistent/engine-binary");
        let err = EngineProcess::spawn(&config).err().expect("spawn should fail");
        assert!(matches!(err, EngineErrors::Spawn { .. }));
    }

    #[test]
    fn echoes_lines_and_waits_for_tokens() {
        let script = "while read line; do echo \"got $line\"; [ \"$line\" = quit ] && exit 0; done";
        let mut process = EngineProcess::spawn(&shell(script)).expect("sh should spawn");

        process.write_line("hello").expect("write should succeed");
        process
            .wait_for_token("got hello", Duration::from_secs(2))
            .expect("echo should arrive");

        process.write_line("a").expect("write should succeed");
        process.write_line("b").expect("write should succeed");
        let mut seen = Vec::new();
        let deadline = Instant::now() + Duration::from_secs(2);
        while seen.len() < 2 && Instant::now() < deadline {
            seen.extend(process.read_lines_for(Duration::from_millis(50)));
        }
        assert_eq!(seen, vec!["got a".to_owned(), "got b".to_owned()]);

        process.shutdown(Duration::from_millis(500));
        process.shutdown(Duration::from_millis(500));
    }

    #[test]
    fn silent_engine_times_out() {
        let mut process = EngineProcess::spawn(&shell("sleep 5")).expect("sh should spawn");
        let err = process
            .wait_for_token("uciok", Duration::from_millis(100))
            .expect_err("silent engine should time out");
        assert!(matches!(err, EngineErrors::HandshakeTimeout { token: "uciok", .. }));
        process.shutdown(Duration::ZERO);
    }

    #[test]
    fn exited_engine_reports_disconnect() {
        let mut process = EngineProcess::spawn(&shell("echo bye")).expect("sh should spawn");
        let lines = process.read_lines_for(Duration::from_secs(2));
        assert_eq!(lines, vec!["bye".to_owned()]);
        assert!(process.is_disconnected());
    }
}
