use crate::error::Result;
use crate::uci_engine::{Engine, EvalLimit, Score};
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Position};
use std::time::Duration;

/// Scripted engine for tests: always plays the first legal move and
/// reports a fixed score
pub struct FakeEngine {
    pub score: Score,
    pub searches: usize,
}

impl FakeEngine {
    pub fn new(score: Score) -> Self {
        FakeEngine { score, searches: 0 }
    }

    fn position(fen: &str) -> Chess {
        Fen::from_ascii(fen.as_bytes())
            .unwrap()
            .into_position(CastlingMode::Standard)
            .unwrap()
    }
}

impl Engine for FakeEngine {
    fn set_skill(&mut self, _level: u8) -> Result<()> {
        Ok(())
    }

    fn best_move(&mut self, fen: &str, _movetime: Duration) -> Result<Option<String>> {
        self.searches += 1;

        Ok(Self::position(fen)
            .legal_moves()
            .first()
            .map(|mov| mov.to_uci(CastlingMode::Standard).to_string()))
    }

    fn evaluate(&mut self, _fen: &str, _limit: EvalLimit) -> Result<Score> {
        Ok(self.score)
    }
}
