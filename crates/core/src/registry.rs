use async_trait::async_trait;
use thiserror::Error;

use crate::domain::champion::Champion;
use crate::domain::participant::{Identity, PlayerProfile};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("registry lookup failed: {0}")]
    Lookup(String),
    #[error("champion catalog holds {available} champions but {requested} were requested")]
    InsufficientChampions { requested: usize, available: usize },
}

/// Lookup of registered player profiles by chat-platform identity.
#[async_trait]
pub trait PlayerDirectory: Send + Sync {
    async fn find_profile(
        &self,
        identity: &Identity,
    ) -> Result<Option<PlayerProfile>, RegistryError>;
}

/// Random sampling from the cached champion reference set.
///
/// `sample` draws `count` distinct champions uniformly at random and fails
/// with `InsufficientChampions` when the catalog is smaller than the request.
#[async_trait]
pub trait ChampionCatalog: Send + Sync {
    async fn sample(&self, count: usize) -> Result<Vec<Champion>, RegistryError>;
}
