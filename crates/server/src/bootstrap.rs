use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use araminator_core::config::{AppConfig, ConfigError, LoadOptions};
use araminator_core::SessionController;
use araminator_db::repositories::{SqlChampionRepository, SqlPlayerRepository};
use araminator_db::{connect_with_settings, migrations, DbPool};
use araminator_discord::events::{
    ComponentInteractionHandler, EventDispatcher, SlashCommandHandler,
};
use araminator_discord::gateway::GatewayRunner;

use crate::riot::{RiotApiError, RiotClient};
use crate::services::BotServices;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub controller: Arc<SessionController>,
    pub gateway_runner: GatewayRunner,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("riot client construction failed: {0}")]
    Riot(#[source] RiotApiError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let players = Arc::new(SqlPlayerRepository::new(db_pool.clone()));
    let champions = Arc::new(SqlChampionRepository::new(db_pool.clone()));
    let controller = Arc::new(SessionController::new(players.clone(), champions.clone()));
    let riot = Arc::new(RiotClient::new(&config.riot).map_err(BootstrapError::Riot)?);

    let services = BotServices::new(controller.clone(), players, champions, riot);
    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(SlashCommandHandler::new(services.clone()));
    dispatcher.register(ComponentInteractionHandler::new(services));

    Ok(Application {
        config,
        db_pool,
        controller,
        gateway_runner: GatewayRunner::with_noop_transport(dispatcher),
    })
}

#[cfg(test)]
mod tests {
    use araminator_core::config::{ConfigOverrides, LoadOptions};
    use araminator_core::{Identity, ScopeId};

    use crate::bootstrap::bootstrap;

    #[tokio::test]
    async fn bootstrap_fails_fast_without_a_riot_api_key() {
        let result = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some("sqlite::memory:".to_string()),
                discord_bot_token: Some("bot-token".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .await;

        assert!(result.is_err());
        let message = result.err().expect("error").to_string();
        assert!(message.contains("riot.api_key"));
    }

    #[tokio::test]
    async fn integration_smoke_covers_startup_data_path_and_session_checkpoints() {
        let app = bootstrap(valid_overrides("sqlite::memory:?cache=shared"))
            .await
            .expect("bootstrap should succeed with valid overrides");

        let (table_count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master \
             WHERE type = 'table' AND name IN ('player', 'champion')",
        )
        .fetch_one(&app.db_pool)
        .await
        .expect("expected registry tables to be available after bootstrap");
        assert_eq!(table_count, 2, "bootstrap should expose baseline registry tables");

        assert!(app.gateway_runner.is_noop_transport());

        for (discord_id, game_name) in [("1001", "ana"), ("1002", "bob")] {
            sqlx::query(
                "INSERT INTO player (discord_id, game_name, tag_line, puuid) \
                 VALUES (?1, ?2, 'EUW', ?2 || '-puuid')",
            )
            .bind(discord_id)
            .bind(game_name)
            .execute(&app.db_pool)
            .await
            .expect("seed player");
        }
        for key in 1..=10 {
            sqlx::query("INSERT INTO champion (key, id, name) VALUES (?1, 'champ' || ?1, 'Champ ' || ?1)")
                .bind(key)
                .execute(&app.db_pool)
                .await
                .expect("seed champion");
        }

        let scope = ScopeId("C1".to_owned());
        app.controller.start_session(&scope).await.expect("start session");
        app.controller.join(&scope, Identity("1001".to_owned())).await.expect("join ana");
        app.controller.join(&scope, Identity("1002".to_owned())).await.expect("join bob");

        let rolled = app.controller.roll_teams(&scope).await.expect("roll teams");
        let team_count = rolled.team_a.iter().chain(rolled.team_b.iter()).count();
        assert_eq!(team_count, 2, "two players should fill both teams");

        let summary = app.controller.roll_champions(&scope).await.expect("roll champions");
        let pool_total = summary
            .team_a
            .iter()
            .chain(summary.team_b.iter())
            .map(|team| team.champions.len())
            .sum::<usize>();
        assert_eq!(pool_total, 4, "one slot per team draws four champions total");

        app.controller.end_session(&scope).await.expect("end session");

        app.db_pool.close().await;
    }

    fn valid_overrides(database_url: &str) -> LoadOptions {
        LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some(database_url.to_string()),
                discord_bot_token: Some("bot-token".to_string()),
                riot_api_key: Some("riot-key".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }
    }
}
