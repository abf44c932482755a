use thiserror::Error;

pub mod champion;
pub mod memory;
pub mod player;

pub use champion::SqlChampionRepository;
pub use memory::{InMemoryChampionRepository, InMemoryPlayerRepository};
pub use player::{SqlPlayerRepository, UpsertOutcome};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}
