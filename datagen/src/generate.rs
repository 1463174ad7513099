use crate::error::{DatagenError, Result};
use crate::uci_engine::Engine;
use rand::Rng;
use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{Chess, EnPassantMode, Position};
use std::time::Duration;

/// Self-play configuration. Unset fields are randomized per game so the
/// generated positions (and their evaluations) spread away from 0.0
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Number of plies to play, random in 40..=70 if unset
    pub plies: Option<usize>,

    /// Skill level for White, random in 1..=20 if unset
    pub white_skill: Option<u8>,

    /// Skill level for Black, random in 1..=20 if unset
    pub black_skill: Option<u8>,

    /// Time budget per move
    pub time_per_move: Duration,
}

/// FEN string of a position, for the engine
pub fn fen_of(position: &Chess) -> String {
    Fen(position.clone().into_setup(EnPassantMode::Always)).to_string()
}

/// Plays the engine against itself from the starting position and returns
/// where the game ended up. Never returns a terminal position: the
/// evaluator and the encoders need an in-progress game, so the history is
/// walked back past any mate or stalemate (the start position never is one)
pub fn generate_position<E: Engine>(
    engine: &mut E,
    config: &GenerateConfig,
    rng: &mut impl Rng,
) -> Result<Chess> {
    let plies = config.plies.unwrap_or_else(|| rng.gen_range(40..=70));
    let white_skill = config.white_skill.unwrap_or_else(|| rng.gen_range(1..=20));
    let black_skill = config.black_skill.unwrap_or_else(|| rng.gen_range(1..=20));

    log::info!(
        "playing {} plies, skills {} vs {}",
        plies,
        white_skill,
        black_skill
    );

    let mut history = vec![Chess::default()];

    for ply in 0..plies {
        let position = history.last().unwrap().clone();

        if position.is_game_over() {
            log::info!("game over at ply {}", ply);
            break;
        }

        let skill = if ply % 2 == 0 {
            white_skill
        } else {
            black_skill
        };
        engine.set_skill(skill)?;

        let Some(uci) = engine.best_move(&fen_of(&position), config.time_per_move)? else {
            break;
        };

        let mov = uci
            .parse::<UciMove>()
            .map_err(|_| DatagenError::InvalidMove(uci.clone()))?
            .to_move(&position)
            .map_err(|_| DatagenError::InvalidMove(uci.clone()))?;

        history.push(position.play(&mov).map_err(|_| DatagenError::InvalidMove(uci))?);
    }

    while history.last().unwrap().is_game_over() {
        history.pop();
    }

    Ok(history.pop().unwrap())
}
