//! Service implementations wiring the gateway traits to the session core and
//! the registry repositories. All session failures are rendered here as
//! ephemeral notices; only collaborator transport failures propagate as
//! errors.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use araminator_core::config::RiotRegion;
use araminator_core::{
    Champion, Identity, PlayerProfile, ScopeId, SessionController, SessionSummary,
};
use araminator_db::repositories::{SqlChampionRepository, SqlPlayerRepository, UpsertOutcome};
use araminator_discord::commands::{
    CommandEnvelope, CommandRouteError, RiotId, SessionCommandService,
};
use araminator_discord::embeds::{self, MessageTemplate};
use araminator_discord::events::{
    ComponentInteractionEvent, EventHandlerError, SessionActionOutcome, SessionActionService,
};

use crate::riot::{RiotApiError, RiotClient};

/// Seam over the Game Data Provider so services can be exercised without the
/// network.
#[async_trait]
pub trait AccountProvider: Send + Sync {
    async fn account_by_riot_id(
        &self,
        game_name: &str,
        tag_line: &str,
        region: Option<RiotRegion>,
    ) -> Result<Option<PlayerProfile>, RiotApiError>;

    async fn champions(&self) -> Result<Vec<Champion>, RiotApiError>;
}

#[async_trait]
impl AccountProvider for RiotClient {
    async fn account_by_riot_id(
        &self,
        game_name: &str,
        tag_line: &str,
        region: Option<RiotRegion>,
    ) -> Result<Option<PlayerProfile>, RiotApiError> {
        RiotClient::account_by_riot_id(self, game_name, tag_line, region).await
    }

    async fn champions(&self) -> Result<Vec<Champion>, RiotApiError> {
        RiotClient::champions(self).await
    }
}

pub struct BotServices<P> {
    controller: Arc<SessionController>,
    players: Arc<SqlPlayerRepository>,
    champions: Arc<SqlChampionRepository>,
    provider: Arc<P>,
}

impl<P> Clone for BotServices<P> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            players: self.players.clone(),
            champions: self.champions.clone(),
            provider: self.provider.clone(),
        }
    }
}

impl<P> BotServices<P>
where
    P: AccountProvider,
{
    pub fn new(
        controller: Arc<SessionController>,
        players: Arc<SqlPlayerRepository>,
        champions: Arc<SqlChampionRepository>,
        provider: Arc<P>,
    ) -> Self {
        Self { controller, players, champions, provider }
    }

    fn summary_message(summary: &SessionSummary) -> MessageTemplate {
        embeds::session_summary_message(summary, Utc::now())
    }
}

#[async_trait]
impl<P> SessionCommandService for BotServices<P>
where
    P: AccountProvider + 'static,
{
    async fn start_session(
        &self,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        let scope = ScopeId(envelope.channel_id.clone());
        match self.controller.start_session(&scope).await {
            Ok(summary) => Ok(Self::summary_message(&summary)),
            Err(error) => Ok(embeds::failure_notice(&error)),
        }
    }

    async fn end_session(
        &self,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        let scope = ScopeId(envelope.channel_id.clone());
        match self.controller.end_session(&scope).await {
            Ok(()) => Ok(embeds::notice_message("🛑 ARAM session ended.")),
            Err(error) => Ok(embeds::failure_notice(&error)),
        }
    }

    async fn register(
        &self,
        riot_id: RiotId,
        region: Option<RiotRegion>,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        let account = self
            .provider
            .account_by_riot_id(&riot_id.game_name, &riot_id.tag_line, region)
            .await
            .map_err(|error| CommandRouteError::Service(error.to_string()))?;

        let Some(profile) = account else {
            return Ok(embeds::notice_message(format!(
                "Riot ID {}#{} could not be found. Please check name and region.",
                riot_id.game_name, riot_id.tag_line,
            )));
        };

        let identity = Identity(envelope.user_id.clone());
        let outcome = self
            .players
            .upsert(&identity, &profile)
            .await
            .map_err(|error| CommandRouteError::Service(error.to_string()))?;

        Ok(embeds::register_message(
            &profile.riot_id(),
            outcome == UpsertOutcome::Updated,
        ))
    }

    async fn sync_champions(
        &self,
        _envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        let champions = self
            .provider
            .champions()
            .await
            .map_err(|error| CommandRouteError::Service(error.to_string()))?;

        self.champions
            .upsert_all(&champions)
            .await
            .map_err(|error| CommandRouteError::Service(error.to_string()))?;

        Ok(embeds::champion_sync_message(champions.len()))
    }

    async fn list_champions(
        &self,
        _envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        let champions = self
            .champions
            .list_all()
            .await
            .map_err(|error| CommandRouteError::Service(error.to_string()))?;

        Ok(embeds::champion_list_message(&champions))
    }
}

#[async_trait]
impl<P> SessionActionService for BotServices<P>
where
    P: AccountProvider + 'static,
{
    async fn join(
        &self,
        event: &ComponentInteractionEvent,
    ) -> Result<SessionActionOutcome, EventHandlerError> {
        let scope = ScopeId(event.channel_id.clone());
        let identity = Identity(event.user_id.clone());
        Ok(match self.controller.join(&scope, identity).await {
            Ok(summary) => SessionActionOutcome {
                summary: Some(Self::summary_message(&summary)),
                notice: Some(embeds::notice_message("✅ You joined the ARAM session!")),
            },
            Err(error) => failure_outcome(&error),
        })
    }

    async fn leave(
        &self,
        event: &ComponentInteractionEvent,
    ) -> Result<SessionActionOutcome, EventHandlerError> {
        let scope = ScopeId(event.channel_id.clone());
        let identity = Identity(event.user_id.clone());
        Ok(match self.controller.leave(&scope, &identity).await {
            Ok(summary) => SessionActionOutcome {
                summary: Some(Self::summary_message(&summary)),
                notice: Some(embeds::notice_message("🚪 You left the ARAM session.")),
            },
            Err(error) => failure_outcome(&error),
        })
    }

    async fn roll_teams(
        &self,
        event: &ComponentInteractionEvent,
    ) -> Result<SessionActionOutcome, EventHandlerError> {
        let scope = ScopeId(event.channel_id.clone());
        Ok(match self.controller.roll_teams(&scope).await {
            Ok(summary) => SessionActionOutcome {
                summary: Some(Self::summary_message(&summary)),
                notice: None,
            },
            Err(error) => failure_outcome(&error),
        })
    }

    async fn roll_champions(
        &self,
        event: &ComponentInteractionEvent,
    ) -> Result<SessionActionOutcome, EventHandlerError> {
        let scope = ScopeId(event.channel_id.clone());
        Ok(match self.controller.roll_champions(&scope).await {
            Ok(summary) => SessionActionOutcome {
                summary: Some(Self::summary_message(&summary)),
                notice: None,
            },
            Err(error) => failure_outcome(&error),
        })
    }

    async fn swap_team(
        &self,
        event: &ComponentInteractionEvent,
    ) -> Result<SessionActionOutcome, EventHandlerError> {
        let scope = ScopeId(event.channel_id.clone());
        let identity = Identity(event.user_id.clone());
        Ok(match self.controller.swap_team(&scope, &identity).await {
            Ok(summary) => SessionActionOutcome {
                summary: Some(Self::summary_message(&summary)),
                notice: None,
            },
            Err(error) => failure_outcome(&error),
        })
    }
}

fn failure_outcome(error: &araminator_core::SessionError) -> SessionActionOutcome {
    SessionActionOutcome { summary: None, notice: Some(embeds::failure_notice(error)) }
}
