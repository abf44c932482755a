use async_trait::async_trait;
use sqlx::Row;

use araminator_core::registry::{PlayerDirectory, RegistryError};
use araminator_core::{Identity, PlayerProfile};

use super::RepositoryError;
use crate::DbPool;

/// Whether a registration wrote a new row or refreshed an existing one. The
/// register command words its reply differently for the two cases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

pub struct SqlPlayerRepository {
    pool: DbPool,
}

impl SqlPlayerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_identity(
        &self,
        identity: &Identity,
    ) -> Result<Option<PlayerProfile>, RepositoryError> {
        let row = sqlx::query(
            "SELECT game_name, tag_line, puuid FROM player WHERE discord_id = ?1",
        )
        .bind(&identity.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| PlayerProfile {
            game_name: row.get("game_name"),
            tag_line: row.get("tag_line"),
            puuid: row.get("puuid"),
        }))
    }

    pub async fn upsert(
        &self,
        identity: &Identity,
        profile: &PlayerProfile,
    ) -> Result<UpsertOutcome, RepositoryError> {
        let existing = self.find_by_identity(identity).await?;

        if existing.is_some() {
            sqlx::query(
                "UPDATE player SET game_name = ?1, tag_line = ?2, puuid = ?3
                 WHERE discord_id = ?4",
            )
            .bind(&profile.game_name)
            .bind(&profile.tag_line)
            .bind(&profile.puuid)
            .bind(&identity.0)
            .execute(&self.pool)
            .await?;
            return Ok(UpsertOutcome::Updated);
        }

        sqlx::query(
            "INSERT INTO player (discord_id, game_name, tag_line, puuid)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&identity.0)
        .bind(&profile.game_name)
        .bind(&profile.tag_line)
        .bind(&profile.puuid)
        .execute(&self.pool)
        .await?;
        Ok(UpsertOutcome::Inserted)
    }
}

#[async_trait]
impl PlayerDirectory for SqlPlayerRepository {
    async fn find_profile(
        &self,
        identity: &Identity,
    ) -> Result<Option<PlayerProfile>, RegistryError> {
        self.find_by_identity(identity)
            .await
            .map_err(|error| RegistryError::Lookup(error.to_string()))
    }
}
