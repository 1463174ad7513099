use crate::error::{DatagenError, Result};
use crate::generate::fen_of;
use crate::uci_engine::{Engine, EvalLimit, Score};
use shakmaty::{Chess, Color, Position};

/// Scores a position in pawns (centipawns / 100) from White's perspective.
/// Mate scores have no centipawn value and surface as
/// [`DatagenError::EvaluationUndefined`] so the caller can skip the sample
/// instead of aborting the batch
pub fn evaluate_position<E: Engine>(
    engine: &mut E,
    position: &Chess,
    limit: EvalLimit,
) -> Result<f32> {
    match engine.evaluate(&fen_of(position), limit)? {
        Score::Cp(cp) => {
            // UCI scores are relative to the side to move
            let white_cp = match position.turn() {
                Color::White => cp,
                Color::Black => -cp,
            };
            Ok(white_cp as f32 / 100.0)
        }
        Score::Mate(_) => Err(DatagenError::EvaluationUndefined),
    }
}
