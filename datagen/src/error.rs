use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatagenError {
    /// Mate or stalemate: there is no centipawn score to extract. The
    /// sample is skipped and the batch continues.
    #[error("position has no evaluable continuation")]
    EvaluationUndefined,

    /// The engine process died mid-batch. The whole batch is restarted.
    #[error("engine process terminated: {0}")]
    EngineTerminated(io::Error),

    /// The engine binary could not be started at all. Restarting would
    /// spin forever, so this aborts the run.
    #[error("failed to start engine: {0}")]
    EngineSpawn(io::Error),

    #[error("unexpected engine output: {0}")]
    EngineProtocol(String),

    #[error("engine played an invalid move: {0}")]
    InvalidMove(String),

    #[error("invalid position: {0}")]
    InvalidFen(String),

    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, DatagenError>;
