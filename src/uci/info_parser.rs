//! Parsing of streamed `info` records into ranked engine lines.

/// One ranked line of engine analysis.
///
/// `mate` is signed plies from the side to move's point of view; `0` means no
/// mate was reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineLine {
    pub pv: Vec<String>,
    pub score_cp: i32,
    pub mate: i32,
    pub depth: u32,
    /// 1-based rank reported by the engine; `1` when MultiPV is not in use.
    pub multipv: u32,
}

impl EngineLine {
    /// Centipawns, with mates mapped to `±MATE_SCORE`.
    pub fn evaluation(&self) -> i32 {
        match self.mate.signum() {
            1 => MATE_SCORE,
            -1 => -MATE_SCORE,
            _ => self.score_cp,
        }
    }

    pub fn first_move(&self) -> Option<&str> {
        self.pv.first().map(String::as_str)
    }
}

pub const MATE_SCORE: i32 = 10_000;

/// Parse an `info ... score {cp N|mate N} ... pv m1 m2 ...` line.
///
/// Lines without both a score and a principal variation (currmove updates,
/// `info string`, hash statistics) return `None`.
pub fn parse_info_line(line: &str) -> Option<EngineLine> {
    let mut tokens = line.split_whitespace();
    if tokens.next() != Some("info") {
        return None;
    }

    let mut parsed = EngineLine {
        multipv: 1,
        ..EngineLine::default()
    };
    let mut has_score = false;

    while let Some(token) = tokens.next() {
        match token {
            "depth" => parsed.depth = tokens.next()?.parse().ok()?,
            "multipv" => parsed.multipv = tokens.next()?.parse().ok()?,
            "score" => {
                match tokens.next()? {
                    "cp" => {
                        parsed.score_cp = tokens.next()?.parse().ok()?;
                        parsed.mate = 0;
                    }
                    "mate" => {
                        parsed.mate = tokens.next()?.parse().ok()?;
                        parsed.score_cp = 0;
                    }
                    _ => return None,
                }
                has_score = true;
            }
            "pv" => {
                parsed.pv = tokens.by_ref().map(str::to_owned).collect();
            }
            // Free text runs to the end of the line.
            "string" => return None,
            _ => {}
        }
    }

    if !has_score || parsed.pv.is_empty() {
        return None;
    }

    Some(parsed)
}

/// Extract the move from a `bestmove <move> [ponder <move>]` line.
pub fn parse_bestmove_line(line: &str) -> Option<String> {
    let mut tokens = line.split_whitespace();
    if tokens.next() != Some("bestmove") {
        return None;
    }
    tokens.next().map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_centipawn_line() {
        let line = "info depth 12 seldepth 18 multipv 2 score cp -35 nodes 91234 nps 1200000 hashfull 12 tbhits 0 time 76 pv e7e5 g1f3 b8c6";
        let parsed = parse_info_line(line).expect("info line should parse");

        assert_eq!(parsed.depth, 12);
        assert_eq!(parsed.multipv, 2);
        assert_eq!(parsed.score_cp, -35);
        assert_eq!(parsed.mate, 0);
        assert_eq!(parsed.pv, vec!["e7e5", "g1f3", "b8c6"]);
        assert_eq!(parsed.evaluation(), -35);
        assert_eq!(parsed.first_move(), Some("e7e5"));
    }

    #[test]
    fn parses_mate_and_bound_annotations() {
        let parsed = parse_info_line("info depth 20 score mate -3 upperbound pv h7h6 d1h5")
            .expect("mate line should parse");

        assert_eq!(parsed.mate, -3);
        assert_eq!(parsed.multipv, 1);
        assert_eq!(parsed.evaluation(), -MATE_SCORE);
    }

    #[test]
    fn ignores_lines_without_score_or_pv() {
        assert_eq!(parse_info_line("info depth 5 currmove e2e4 currmovenumber 1"), None);
        assert_eq!(parse_info_line("info string NNUE evaluation enabled"), None);
        assert_eq!(parse_info_line("info depth 3 score cp 12"), None);
        assert_eq!(parse_info_line("info depth x score cp 12 pv e2e4"), None);
        assert_eq!(parse_info_line("readyok"), None);
    }

    #[test]
    fn bestmove_extraction() {
        assert_eq!(parse_bestmove_line("bestmove e2e4 ponder e7e5"), Some("e2e4".to_owned()));
        assert_eq!(parse_bestmove_line("bestmove (none)"), Some("(none)".to_owned()));
        assert_eq!(parse_bestmove_line("info depth 1"), None);
    }
}
