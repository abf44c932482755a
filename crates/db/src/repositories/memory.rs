use std::collections::HashMap;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use tokio::sync::RwLock;

use araminator_core::registry::{ChampionCatalog, PlayerDirectory, RegistryError};
use araminator_core::{Champion, Identity, PlayerProfile};

/// Process-memory player directory for tests and wiring without a database.
#[derive(Default)]
pub struct InMemoryPlayerRepository {
    players: RwLock<HashMap<String, PlayerProfile>>,
}

impl InMemoryPlayerRepository {
    pub async fn insert(&self, identity: Identity, profile: PlayerProfile) {
        let mut players = self.players.write().await;
        players.insert(identity.0, profile);
    }
}

#[async_trait]
impl PlayerDirectory for InMemoryPlayerRepository {
    async fn find_profile(
        &self,
        identity: &Identity,
    ) -> Result<Option<PlayerProfile>, RegistryError> {
        let players = self.players.read().await;
        Ok(players.get(&identity.0).cloned())
    }
}

/// Process-memory champion catalog double with the same sampling contract as
/// the SQL repository: distinct rows, failure when the catalog is too small.
#[derive(Default)]
pub struct InMemoryChampionRepository {
    champions: RwLock<Vec<Champion>>,
}

impl InMemoryChampionRepository {
    pub fn with_champions(champions: Vec<Champion>) -> Self {
        Self { champions: RwLock::new(champions) }
    }
}

#[async_trait]
impl ChampionCatalog for InMemoryChampionRepository {
    async fn sample(&self, count: usize) -> Result<Vec<Champion>, RegistryError> {
        let champions = self.champions.read().await;
        if champions.len() < count {
            return Err(RegistryError::InsufficientChampions {
                requested: count,
                available: champions.len(),
            });
        }

        let mut rng = rand::thread_rng();
        Ok(champions.choose_multiple(&mut rng, count).cloned().collect())
    }
}
