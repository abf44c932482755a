use async_trait::async_trait;
use thiserror::Error;

use araminator_core::config::RiotRegion;

use crate::embeds::{self, MessageTemplate};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlashCommandPayload {
    pub command: String,
    pub options: Vec<(String, String)>,
    pub channel_id: String,
    pub user_id: String,
    pub request_id: String,
}

/// Caller context forwarded to every command handler: the channel is the
/// session scope, the user is the acting identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandEnvelope {
    pub channel_id: String,
    pub user_id: String,
    pub request_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RiotId {
    pub game_name: String,
    pub tag_line: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    StartSession,
    EndSession,
    Register { riot_id: RiotId, region: Option<RiotRegion> },
    SyncChampions,
    ListChampions,
    Unknown { command: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("riot id `{0}` is not in `Name#Tag` format")]
    InvalidRiotIdFormat(String),
    #[error("unsupported riot region `{0}`")]
    UnsupportedRegion(String),
    #[error("`/register` requires a riot_id option")]
    MissingRiotId,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandRouteError {
    #[error("command service failed: {0}")]
    Service(String),
}

/// Splits `Name#Tag` into its parts. Both sides must be non-empty; the tag is
/// normalized to upper case the way the account API expects it.
pub fn parse_riot_id(raw: &str) -> Result<RiotId, CommandParseError> {
    let trimmed = raw.trim();
    let Some((game_name, tag_line)) = trimmed.split_once('#') else {
        return Err(CommandParseError::InvalidRiotIdFormat(trimmed.to_owned()));
    };

    let game_name = game_name.trim();
    let tag_line = tag_line.trim();
    if game_name.is_empty() || tag_line.is_empty() || tag_line.contains('#') {
        return Err(CommandParseError::InvalidRiotIdFormat(trimmed.to_owned()));
    }

    Ok(RiotId { game_name: game_name.to_owned(), tag_line: tag_line.to_ascii_uppercase() })
}

pub fn parse_command(payload: &SlashCommandPayload) -> Result<SessionCommand, CommandParseError> {
    match payload.command.trim_start_matches('/') {
        "aram" => Ok(SessionCommand::StartSession),
        "end_aram" => Ok(SessionCommand::EndSession),
        "register" => {
            let raw_riot_id = option_value(payload, "riot_id")
                .ok_or(CommandParseError::MissingRiotId)?;
            let riot_id = parse_riot_id(raw_riot_id)?;
            let region = match option_value(payload, "region") {
                Some(raw) => Some(
                    raw.parse::<RiotRegion>()
                        .map_err(|_| CommandParseError::UnsupportedRegion(raw.to_owned()))?,
                ),
                None => None,
            };
            Ok(SessionCommand::Register { riot_id, region })
        }
        "sync_champions" => Ok(SessionCommand::SyncChampions),
        "champions" => Ok(SessionCommand::ListChampions),
        other => Ok(SessionCommand::Unknown { command: other.to_owned() }),
    }
}

fn option_value<'a>(payload: &'a SlashCommandPayload, name: &str) -> Option<&'a str> {
    payload
        .options
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
        .filter(|value| !value.trim().is_empty())
}

pub struct CommandRouter<S> {
    service: S,
}

impl<S> CommandRouter<S>
where
    S: SessionCommandService,
{
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub async fn route(
        &self,
        payload: &SlashCommandPayload,
    ) -> Result<MessageTemplate, CommandRouteError> {
        let envelope = CommandEnvelope {
            channel_id: payload.channel_id.clone(),
            user_id: payload.user_id.clone(),
            request_id: payload.request_id.clone(),
        };

        let command = match parse_command(payload) {
            Ok(command) => command,
            Err(parse_error) => {
                return Ok(embeds::notice_message(format!("❌ {parse_error}")));
            }
        };

        match command {
            SessionCommand::StartSession => self.service.start_session(&envelope).await,
            SessionCommand::EndSession => self.service.end_session(&envelope).await,
            SessionCommand::Register { riot_id, region } => {
                self.service.register(riot_id, region, &envelope).await
            }
            SessionCommand::SyncChampions => self.service.sync_champions(&envelope).await,
            SessionCommand::ListChampions => self.service.list_champions(&envelope).await,
            SessionCommand::Unknown { command } => Ok(embeds::notice_message(format!(
                "Unsupported command `/{command}`."
            ))),
        }
    }
}

#[async_trait]
pub trait SessionCommandService: Send + Sync {
    async fn start_session(
        &self,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError>;

    async fn end_session(
        &self,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError>;

    async fn register(
        &self,
        riot_id: RiotId,
        region: Option<RiotRegion>,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError>;

    async fn sync_champions(
        &self,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError>;

    async fn list_champions(
        &self,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError>;
}

#[derive(Default)]
pub struct NoopSessionCommandService;

#[async_trait]
impl SessionCommandService for NoopSessionCommandService {
    async fn start_session(
        &self,
        _envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        Ok(embeds::notice_message("session start requested"))
    }

    async fn end_session(
        &self,
        _envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        Ok(embeds::notice_message("session end requested"))
    }

    async fn register(
        &self,
        riot_id: RiotId,
        _region: Option<RiotRegion>,
        _envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        Ok(embeds::notice_message(format!(
            "registration requested for {}#{}",
            riot_id.game_name, riot_id.tag_line
        )))
    }

    async fn sync_champions(
        &self,
        _envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        Ok(embeds::notice_message("champion sync requested"))
    }

    async fn list_champions(
        &self,
        _envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        Ok(embeds::notice_message("champion list requested"))
    }
}
