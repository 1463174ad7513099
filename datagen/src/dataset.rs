use crate::error::{DatagenError, Result};
use crate::evaluate::evaluate_position;
use crate::generate::{generate_position, GenerateConfig};
use crate::uci_engine::{Engine, EvalLimit, UciEngine};
use clap::Args;
use encoding::Channels;
use indicatif::{ProgressBar, ProgressStyle};
use shakmaty::{Chess, Position};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Args, Clone)]
pub struct GenerateCommand {
    /// UCI engine command used for self-play and evaluation
    #[arg(long, value_name = "engine")]
    engine: String,

    /// Number of samples to generate
    #[arg(long, value_name = "count")]
    count: u64,

    /// Output folder for the PNG samples
    #[arg(long, value_name = "output")]
    output: PathBuf,

    /// Time budget per self-play move, in milliseconds
    #[arg(long, default_value = "5")]
    time_per_move: u64,

    /// Target depth for evaluation
    #[arg(long, default_value = "20")]
    eval_depth: usize,

    /// Time budget for evaluation, in milliseconds
    #[arg(long, default_value = "100")]
    eval_time: u64,

    /// Fixed number of plies per game (random 40-70 if unset)
    #[arg(long)]
    plies: Option<usize>,

    /// Fixed skill level for White (random 1-20 if unset)
    #[arg(long)]
    white_skill: Option<u8>,

    /// Fixed skill level for Black (random 1-20 if unset)
    #[arg(long)]
    black_skill: Option<u8>,
}

impl GenerateCommand {
    fn generate_config(&self) -> GenerateConfig {
        GenerateConfig {
            plies: self.plies,
            white_skill: self.white_skill,
            black_skill: self.black_skill,
            time_per_move: Duration::from_millis(self.time_per_move),
        }
    }

    fn eval_limit(&self) -> EvalLimit {
        EvalLimit {
            depth: self.eval_depth,
            movetime: Duration::from_millis(self.eval_time),
        }
    }
}

/// Writes a merged channel stack as an 8x8 RGB PNG
pub fn save_merged(merged: &Channels<3>, path: &Path) -> Result<()> {
    let image = image::RgbImage::from_fn(8, 8, |col, row| {
        image::Rgb(merged[row as usize][col as usize])
    });

    image.save(path)?;
    Ok(())
}

/// Encodes a position and writes it as a sample image
fn write_sample(position: &Chess, path: &Path) -> Result<()> {
    let board = position.board();
    let merged = encoding::merge(&encoding::pieces::encode(board), &encoding::control::encode(board));
    save_merged(&merged, path)
}

/// Runs one batch: generate, evaluate, encode, write. A sample whose
/// evaluation is undefined is skipped; engine failures abort the batch.
/// Each output file is named with its sequence index and evaluation score
pub fn run_batch<E: Engine>(
    cmd: &GenerateCommand,
    mut spawn_engine: impl FnMut() -> Result<E>,
) -> Result<()> {
    std::fs::create_dir_all(&cmd.output)?;

    let config = cmd.generate_config();
    let limit = cmd.eval_limit();
    let mut rng = rand::thread_rng();

    let bar = ProgressBar::new(cmd.count).with_style(
        ProgressStyle::default_bar()
            .template("[Elapsed {elapsed_precise}] {bar:40} {pos}/{len} {msg}")
            .unwrap(),
    );

    let mut written = 0u64;

    for index in 0..cmd.count {
        let position = {
            let mut engine = spawn_engine()?;
            generate_position(&mut engine, &config, &mut rng)?
        };

        let score = {
            let mut engine = spawn_engine()?;
            evaluate_position(&mut engine, &position, limit)
        };

        let score = match score {
            Ok(score) => score,
            Err(DatagenError::EvaluationUndefined) => {
                log::warn!("eval failed for sample {}: no continuation, skipping", index);
                bar.inc(1);
                continue;
            }
            Err(err) => return Err(err),
        };

        write_sample(&position, &cmd.output.join(format!("game{} {}.png", index, score)))?;

        written += 1;
        bar.inc(1);
        bar.set_message(format!("[written {}]", written));
    }

    bar.finish();
    log::info!("done, {} samples written", written);

    Ok(())
}

/// Batch entry point. An engine process dying mid-batch restarts the whole
/// batch from scratch, indefinitely; everything else propagates
pub fn generate_dataset(cmd: &GenerateCommand) -> Result<()> {
    loop {
        match run_batch(cmd, || UciEngine::spawn(&cmd.engine)) {
            Err(DatagenError::EngineTerminated(err)) => {
                log::warn!("engine terminated: {}, restarting batch", err);
            }
            result => return result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_engine::FakeEngine;
    use crate::uci_engine::Score;
    use shakmaty::Board;

    fn command(count: u64, output: &Path) -> GenerateCommand {
        GenerateCommand {
            engine: "unused".to_string(),
            count,
            output: output.to_path_buf(),
            time_per_move: 1,
            eval_depth: 1,
            eval_time: 1,
            plies: Some(2),
            white_skill: Some(5),
            black_skill: Some(5),
        }
    }

    #[test]
    fn batch_writes_one_file_per_sample() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = command(4, dir.path());

        run_batch(&cmd, || Ok(FakeEngine::new(Score::Cp(42)))).unwrap();

        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();

        // two plies leave White to move, so the score stays positive
        assert_eq!(
            names,
            vec![
                "game0 0.42.png",
                "game1 0.42.png",
                "game2 0.42.png",
                "game3 0.42.png",
            ]
        );
    }

    #[test]
    fn undefined_evaluations_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = command(3, dir.path());

        run_batch(&cmd, || Ok(FakeEngine::new(Score::Mate(1)))).unwrap();

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn png_preserves_pixel_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.png");

        let board = Board::default();
        let merged = encoding::merge(&encoding::pieces::encode(&board), &encoding::control::encode(&board));
        save_merged(&merged, &path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (8, 8));
        for row in 0..8 {
            for col in 0..8 {
                assert_eq!(decoded.get_pixel(col as u32, row as u32).0, merged[row][col]);
            }
        }
    }
}
