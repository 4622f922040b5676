//! Harness error type.

use thiserror::Error;

use abyss_sim::persistence::PersistError;
use abyss_sim::world_setup::PlacementError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid vehicle config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("vehicle placement failed: {0}")]
    Placement(#[from] PlacementError),
    #[error("save failed: {0}")]
    Persist(#[from] PersistError),
    #[error("game loop thread panicked")]
    GameLoopPanicked,
}
