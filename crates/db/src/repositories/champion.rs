use async_trait::async_trait;
use sqlx::Row;

use araminator_core::registry::{ChampionCatalog, RegistryError};
use araminator_core::Champion;

use super::RepositoryError;
use crate::DbPool;

pub struct SqlChampionRepository {
    pool: DbPool,
}

impl SqlChampionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert-or-update by champion key. A missing emoji in the incoming data
    /// keeps the stored one, since emoji are assigned out of band.
    pub async fn upsert_all(&self, champions: &[Champion]) -> Result<(), RepositoryError> {
        for champion in champions {
            sqlx::query(
                "INSERT INTO champion (key, id, name, emoji) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(key) DO UPDATE SET
                     id = excluded.id,
                     name = excluded.name,
                     emoji = COALESCE(excluded.emoji, champion.emoji)",
            )
            .bind(champion.key)
            .bind(&champion.id)
            .bind(&champion.name)
            .bind(&champion.emoji)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    pub async fn count(&self) -> Result<usize, RepositoryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM champion").fetch_one(&self.pool).await?;
        Ok(count as usize)
    }

    pub async fn list_all(&self) -> Result<Vec<Champion>, RepositoryError> {
        let rows = sqlx::query("SELECT key, id, name, emoji FROM champion ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(row_to_champion).collect())
    }
}

#[async_trait]
impl ChampionCatalog for SqlChampionRepository {
    async fn sample(&self, count: usize) -> Result<Vec<Champion>, RegistryError> {
        let available =
            self.count().await.map_err(|error| RegistryError::Lookup(error.to_string()))?;
        if available < count {
            return Err(RegistryError::InsufficientChampions { requested: count, available });
        }

        let rows = sqlx::query(
            "SELECT key, id, name, emoji FROM champion ORDER BY RANDOM() LIMIT ?1",
        )
        .bind(count as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| RegistryError::Lookup(error.to_string()))?;

        Ok(rows.into_iter().map(row_to_champion).collect())
    }
}

fn row_to_champion(row: sqlx::sqlite::SqliteRow) -> Champion {
    Champion {
        key: row.get("key"),
        id: row.get("id"),
        name: row.get("name"),
        emoji: row.get("emoji"),
    }
}
