use crate::error::{DatagenError, Result};
use std::io::{self, BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::Duration;

/// Score of a position, given by the engine, relative to the side to move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    /// Centipawn
    Cp(i32),

    /// Mate/Mated in n
    Mate(i32),
}

/// Bounds for a position evaluation
#[derive(Debug, Clone, Copy)]
pub struct EvalLimit {
    /// Target depth for the search
    pub depth: usize,

    /// Time budget for the search
    pub movetime: Duration,
}

/// The three engine operations the pipeline depends on. Kept narrow so
/// generation and evaluation can run against a scripted engine in tests
pub trait Engine {
    /// Configures the playing strength for subsequent searches (0-20)
    fn set_skill(&mut self, level: u8) -> Result<()>;

    /// Best move for the position within the time budget, in UCI
    /// notation. None if the engine has no move to play
    fn best_move(&mut self, fen: &str, movetime: Duration) -> Result<Option<String>>;

    /// Score of the position under the given limit
    fn evaluate(&mut self, fen: &str, limit: EvalLimit) -> Result<Score>;
}

/// Simple UCI engine wrapper around a child process
/// https://www.wbec-ridderkerk.nl/html/UCIProtocol.html
pub struct UciEngine {
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
}

impl UciEngine {
    /// Spawns the engine binary and performs the UCI handshake
    pub fn spawn(binary: &str) -> Result<Self> {
        let mut child = Command::new(binary)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(DatagenError::EngineSpawn)?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| protocol("engine stdin not captured"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| protocol("engine stdout not captured"))?;

        let mut engine = UciEngine {
            child,
            stdin,
            reader: BufReader::new(stdout),
        };

        engine.send("uci")?;
        engine.wait_for("uciok")?;
        engine.send("isready")?;
        engine.wait_for("readyok")?;

        Ok(engine)
    }

    fn send(&mut self, command: &str) -> Result<()> {
        writeln!(self.stdin, "{}", command).map_err(DatagenError::EngineTerminated)?;
        self.stdin.flush().map_err(DatagenError::EngineTerminated)
    }

    /// Reads the next line from the engine; EOF means the process died
    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .map_err(DatagenError::EngineTerminated)?;

        if read == 0 {
            return Err(DatagenError::EngineTerminated(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "engine closed its stdout",
            )));
        }

        Ok(line)
    }

    fn wait_for(&mut self, marker: &str) -> Result<()> {
        loop {
            if self.read_line()?.trim() == marker {
                return Ok(());
            }
        }
    }

    /// Reads engine output until bestmove, keeping the last reported score
    fn read_search_result(&mut self) -> Result<(Option<Score>, Option<String>)> {
        let mut score = None;

        loop {
            let line = self.read_line()?;

            if line.starts_with("bestmove") {
                return Ok((score, parse_bestmove(&line)?));
            }

            if let Some(found) = parse_info_score(&line)? {
                score = Some(found);
            }
        }
    }
}

impl Engine for UciEngine {
    fn set_skill(&mut self, level: u8) -> Result<()> {
        self.send(&format!("setoption name Skill Level value {}", level))
    }

    fn best_move(&mut self, fen: &str, movetime: Duration) -> Result<Option<String>> {
        self.send(&format!("position fen {}", fen))?;
        self.send(&format!("go movetime {}", movetime.as_millis()))?;

        let (_, best_move) = self.read_search_result()?;
        Ok(best_move)
    }

    fn evaluate(&mut self, fen: &str, limit: EvalLimit) -> Result<Score> {
        self.send(&format!("position fen {}", fen))?;
        self.send(&format!(
            "go depth {} movetime {}",
            limit.depth,
            limit.movetime.as_millis()
        ))?;

        let (score, _) = self.read_search_result()?;
        // terminal positions produce no score line
        score.ok_or(DatagenError::EvaluationUndefined)
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        let _ = writeln!(self.stdin, "quit");
        let _ = self.stdin.flush();
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn protocol(line: &str) -> DatagenError {
    DatagenError::EngineProtocol(line.trim().to_string())
}

/// Parses "info ... score (cp|mate) N ..." lines
fn parse_info_score(line: &str) -> Result<Option<Score>> {
    if !line.starts_with("info") || !line.contains(" score ") {
        return Ok(None);
    }

    let mut parts = line.split_whitespace();
    parts
        .position(|p| p == "score")
        .ok_or_else(|| protocol(line))?;

    let kind = parts.next().ok_or_else(|| protocol(line))?;
    let value = parts
        .next()
        .ok_or_else(|| protocol(line))?
        .parse::<i32>()
        .map_err(|_| protocol(line))?;

    match kind {
        "cp" => Ok(Some(Score::Cp(value))),
        "mate" => Ok(Some(Score::Mate(value))),
        _ => Err(protocol(line)),
    }
}

/// Parses a "bestmove ..." line. "(none)" means there is no move to play
fn parse_bestmove(line: &str) -> Result<Option<String>> {
    let best_move = line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| protocol(line))?;

    Ok(if best_move == "(none)" {
        None
    } else {
        Some(best_move.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cp_score() {
        let line = "info depth 12 seldepth 16 multipv 1 score cp -31 nodes 135527 pv e7e5";
        assert_eq!(parse_info_score(line).unwrap(), Some(Score::Cp(-31)));
    }

    #[test]
    fn parses_mate_score() {
        let line = "info depth 5 score mate 3 nodes 1042 pv d8h4";
        assert_eq!(parse_info_score(line).unwrap(), Some(Score::Mate(3)));
    }

    #[test]
    fn ignores_lines_without_a_score() {
        assert_eq!(parse_info_score("readyok").unwrap(), None);
        assert_eq!(
            parse_info_score("info currmove e2e4 currmovenumber 1").unwrap(),
            None
        );
    }

    #[test]
    fn rejects_malformed_scores() {
        assert!(parse_info_score("info depth 1 score cp x").is_err());
        assert!(parse_info_score("info depth 1 score lowerbound").is_err());
    }

    #[test]
    fn parses_bestmove_lines() {
        assert_eq!(
            parse_bestmove("bestmove e2e4 ponder e7e5").unwrap(),
            Some("e2e4".to_string())
        );
        assert_eq!(parse_bestmove("bestmove (none)").unwrap(), None);
        assert!(parse_bestmove("bestmove").is_err());
    }
}
