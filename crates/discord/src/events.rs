use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    commands::{
        CommandParseError, CommandRouteError, CommandRouter, NoopSessionCommandService,
        SessionCommandService, SlashCommandPayload,
    },
    embeds::{self, action_ids, MessageTemplate},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayEnvelope {
    pub envelope_id: String,
    pub event: GatewayEvent,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GatewayEvent {
    SlashCommand(SlashCommandPayload),
    ComponentInteraction(ComponentInteractionEvent),
    Unsupported { event_type: String },
}

impl GatewayEvent {
    pub fn event_type(&self) -> GatewayEventType {
        match self {
            Self::SlashCommand(_) => GatewayEventType::SlashCommand,
            Self::ComponentInteraction(_) => GatewayEventType::ComponentInteraction,
            Self::Unsupported { .. } => GatewayEventType::Unsupported,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GatewayEventType {
    SlashCommand,
    ComponentInteraction,
    Unsupported,
}

/// A button press on the session message. The channel is the session scope
/// and the pressing user is the acting identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentInteractionEvent {
    pub channel_id: String,
    pub message_id: String,
    pub user_id: String,
    pub custom_id: String,
    pub request_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventContext {
    pub correlation_id: String,
}

impl Default for EventContext {
    fn default() -> Self {
        Self { correlation_id: "unknown-correlation-id".to_owned() }
    }
}

/// Outcome of one session button press: the refreshed session display to
/// apply to the live message, plus an ephemeral notice for the actor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionActionOutcome {
    pub summary: Option<MessageTemplate>,
    pub notice: Option<MessageTemplate>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandlerResult {
    Responded(MessageTemplate),
    SessionUpdated(SessionActionOutcome),
    Ignored,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventHandlerError {
    #[error(transparent)]
    Parse(#[from] CommandParseError),
    #[error(transparent)]
    Route(#[from] CommandRouteError),
    #[error("session action handler failure: {0}")]
    SessionAction(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error(transparent)]
    Handler(#[from] EventHandlerError),
}

#[async_trait]
pub trait EventHandler: Send + Sync {
    fn event_type(&self) -> GatewayEventType;
    async fn handle(
        &self,
        envelope: &GatewayEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError>;
}

#[derive(Default)]
pub struct EventDispatcher {
    handlers: HashMap<GatewayEventType, Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<H>(&mut self, handler: H)
    where
        H: EventHandler + 'static,
    {
        self.handlers.insert(handler.event_type(), Arc::new(handler));
    }

    pub async fn dispatch(
        &self,
        envelope: &GatewayEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, DispatchError> {
        let Some(handler) = self.handlers.get(&envelope.event.event_type()) else {
            return Ok(HandlerResult::Ignored);
        };

        handler.handle(envelope, ctx).await.map_err(DispatchError::from)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

pub fn default_dispatcher() -> EventDispatcher {
    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(SlashCommandHandler::new(NoopSessionCommandService));
    dispatcher.register(ComponentInteractionHandler::new(NoopSessionActionService));
    dispatcher
}

pub struct SlashCommandHandler<S> {
    router: CommandRouter<S>,
}

impl<S> SlashCommandHandler<S>
where
    S: SessionCommandService,
{
    pub fn new(service: S) -> Self {
        Self { router: CommandRouter::new(service) }
    }
}

#[async_trait]
impl<S> EventHandler for SlashCommandHandler<S>
where
    S: SessionCommandService + 'static,
{
    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::SlashCommand
    }

    async fn handle(
        &self,
        envelope: &GatewayEnvelope,
        _ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError> {
        let GatewayEvent::SlashCommand(payload) = &envelope.event else {
            return Ok(HandlerResult::Ignored);
        };

        let message = self.router.route(payload).await?;
        Ok(HandlerResult::Responded(message))
    }
}

/// One entrypoint per session button, mirroring the five roster actions the
/// core controller exposes.
#[async_trait]
pub trait SessionActionService: Send + Sync {
    async fn join(
        &self,
        event: &ComponentInteractionEvent,
    ) -> Result<SessionActionOutcome, EventHandlerError>;

    async fn leave(
        &self,
        event: &ComponentInteractionEvent,
    ) -> Result<SessionActionOutcome, EventHandlerError>;

    async fn roll_teams(
        &self,
        event: &ComponentInteractionEvent,
    ) -> Result<SessionActionOutcome, EventHandlerError>;

    async fn roll_champions(
        &self,
        event: &ComponentInteractionEvent,
    ) -> Result<SessionActionOutcome, EventHandlerError>;

    async fn swap_team(
        &self,
        event: &ComponentInteractionEvent,
    ) -> Result<SessionActionOutcome, EventHandlerError>;
}

#[derive(Default)]
pub struct NoopSessionActionService;

#[async_trait]
impl SessionActionService for NoopSessionActionService {
    async fn join(
        &self,
        _event: &ComponentInteractionEvent,
    ) -> Result<SessionActionOutcome, EventHandlerError> {
        Ok(noop_outcome("join requested"))
    }

    async fn leave(
        &self,
        _event: &ComponentInteractionEvent,
    ) -> Result<SessionActionOutcome, EventHandlerError> {
        Ok(noop_outcome("leave requested"))
    }

    async fn roll_teams(
        &self,
        _event: &ComponentInteractionEvent,
    ) -> Result<SessionActionOutcome, EventHandlerError> {
        Ok(noop_outcome("team roll requested"))
    }

    async fn roll_champions(
        &self,
        _event: &ComponentInteractionEvent,
    ) -> Result<SessionActionOutcome, EventHandlerError> {
        Ok(noop_outcome("champion roll requested"))
    }

    async fn swap_team(
        &self,
        _event: &ComponentInteractionEvent,
    ) -> Result<SessionActionOutcome, EventHandlerError> {
        Ok(noop_outcome("team swap requested"))
    }
}

fn noop_outcome(text: &str) -> SessionActionOutcome {
    SessionActionOutcome { summary: None, notice: Some(embeds::notice_message(text)) }
}

pub struct ComponentInteractionHandler<S> {
    service: S,
}

impl<S> ComponentInteractionHandler<S>
where
    S: SessionActionService,
{
    pub fn new(service: S) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<S> EventHandler for ComponentInteractionHandler<S>
where
    S: SessionActionService + 'static,
{
    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::ComponentInteraction
    }

    async fn handle(
        &self,
        envelope: &GatewayEnvelope,
        _ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError> {
        let GatewayEvent::ComponentInteraction(event) = &envelope.event else {
            return Ok(HandlerResult::Ignored);
        };

        let outcome = match event.custom_id.as_str() {
            action_ids::JOIN => self.service.join(event).await?,
            action_ids::LEAVE => self.service.leave(event).await?,
            action_ids::ROLL_TEAMS => self.service.roll_teams(event).await?,
            action_ids::ROLL_CHAMPIONS => self.service.roll_champions(event).await?,
            action_ids::SWAP_TEAM => self.service.swap_team(event).await?,
            _ => return Ok(HandlerResult::Ignored),
        };

        Ok(HandlerResult::SessionUpdated(outcome))
    }
}
