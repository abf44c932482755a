use std::{sync::Arc, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::events::{
    default_dispatcher, DispatchError, EventContext, EventDispatcher, GatewayEnvelope,
    GatewayEvent,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("transport failed to connect: {0}")]
    Connect(String),
    #[error("transport read failed: {0}")]
    Receive(String),
    #[error("transport ack failed: {0}")]
    Acknowledge(String),
    #[error("transport disconnect failed: {0}")]
    Disconnect(String),
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self { max_retries: 5, base_delay_ms: 250, max_delay_ms: 5_000 }
    }
}

impl ReconnectPolicy {
    fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(16);
        let multiplier = 1_u64 << exponent;
        let delay_ms = self.base_delay_ms.saturating_mul(multiplier).min(self.max_delay_ms);
        Duration::from_millis(delay_ms)
    }
}

/// The wire connection to the chat platform. Interactions are acknowledged
/// before dispatch so the platform's response deadline is met even when a
/// handler is slow.
#[async_trait]
pub trait GatewayTransport: Send + Sync {
    async fn connect(&self) -> Result<(), TransportError>;
    async fn next_envelope(&self) -> Result<Option<GatewayEnvelope>, TransportError>;
    async fn acknowledge(&self, envelope_id: &str) -> Result<(), TransportError>;
    async fn disconnect(&self) -> Result<(), TransportError>;
}

#[derive(Default)]
pub struct NoopGatewayTransport;

#[async_trait]
impl GatewayTransport for NoopGatewayTransport {
    async fn connect(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn next_envelope(&self) -> Result<Option<GatewayEnvelope>, TransportError> {
        Ok(None)
    }

    async fn acknowledge(&self, _envelope_id: &str) -> Result<(), TransportError> {
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), TransportError> {
        Ok(())
    }
}

pub struct GatewayRunner {
    transport: Arc<dyn GatewayTransport>,
    dispatcher: EventDispatcher,
    reconnect_policy: ReconnectPolicy,
    noop_transport: bool,
}

impl Default for GatewayRunner {
    fn default() -> Self {
        Self {
            transport: Arc::new(NoopGatewayTransport),
            dispatcher: default_dispatcher(),
            reconnect_policy: ReconnectPolicy::default(),
            noop_transport: true,
        }
    }
}

impl GatewayRunner {
    pub fn new(
        transport: Arc<dyn GatewayTransport>,
        dispatcher: EventDispatcher,
        reconnect_policy: ReconnectPolicy,
    ) -> Self {
        Self { transport, dispatcher, reconnect_policy, noop_transport: false }
    }

    /// Real dispatcher wiring over the placeholder transport, for running
    /// without a live gateway connection.
    pub fn with_noop_transport(dispatcher: EventDispatcher) -> Self {
        Self {
            transport: Arc::new(NoopGatewayTransport),
            dispatcher,
            reconnect_policy: ReconnectPolicy::default(),
            noop_transport: true,
        }
    }

    pub fn is_noop_transport(&self) -> bool {
        self.noop_transport
    }

    pub async fn start(&self) -> Result<()> {
        for attempt in 0..=self.reconnect_policy.max_retries {
            match self.connect_and_pump(attempt).await {
                Ok(()) => return Ok(()),
                Err(transport_error) => {
                    warn!(
                        attempt,
                        max_retries = self.reconnect_policy.max_retries,
                        error = %transport_error,
                        "gateway transport failed"
                    );

                    if attempt >= self.reconnect_policy.max_retries {
                        warn!(
                            max_retries = self.reconnect_policy.max_retries,
                            "gateway retries exhausted; continuing process without crash"
                        );
                        return Ok(());
                    }

                    let delay = self.reconnect_policy.backoff(attempt);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Ok(())
    }

    async fn connect_and_pump(&self, attempt: u32) -> Result<(), TransportError> {
        info!(attempt, "opening gateway transport connection");
        self.transport.connect().await?;
        info!(attempt, "gateway transport connected");

        loop {
            let Some(envelope) = self.transport.next_envelope().await? else {
                info!(attempt, "gateway transport stream closed");
                self.transport.disconnect().await?;
                return Ok(());
            };
            let (scope_id, actor_id) = correlation_fields(&envelope);

            info!(
                event_name = "ingress.discord.envelope_received",
                envelope_id = %envelope.envelope_id,
                event_type = ?envelope.event.event_type(),
                correlation_id = %envelope.envelope_id,
                scope_id = scope_id.as_deref().unwrap_or("unknown"),
                actor_id = actor_id.as_deref().unwrap_or("unknown"),
                "received gateway envelope"
            );

            if let Err(error) = self.transport.acknowledge(&envelope.envelope_id).await {
                warn!(
                    event_name = "ingress.discord.ack_sent",
                    envelope_id = %envelope.envelope_id,
                    correlation_id = %envelope.envelope_id,
                    scope_id = scope_id.as_deref().unwrap_or("unknown"),
                    actor_id = actor_id.as_deref().unwrap_or("unknown"),
                    error = %error,
                    "failed to acknowledge gateway envelope"
                );
            } else {
                debug!(
                    event_name = "ingress.discord.ack_sent",
                    envelope_id = %envelope.envelope_id,
                    correlation_id = %envelope.envelope_id,
                    scope_id = scope_id.as_deref().unwrap_or("unknown"),
                    actor_id = actor_id.as_deref().unwrap_or("unknown"),
                    "acknowledged gateway envelope"
                );
            }

            let context = EventContext { correlation_id: envelope.envelope_id.clone() };
            if let Err(error) = self.dispatcher.dispatch(&envelope, &context).await {
                warn!(
                    envelope_id = %envelope.envelope_id,
                    correlation_id = %envelope.envelope_id,
                    scope_id = scope_id.as_deref().unwrap_or("unknown"),
                    actor_id = actor_id.as_deref().unwrap_or("unknown"),
                    error = %error,
                    "event dispatch failed; continuing gateway loop"
                );
            }
        }
    }
}

fn correlation_fields(envelope: &GatewayEnvelope) -> (Option<String>, Option<String>) {
    match &envelope.event {
        GatewayEvent::SlashCommand(payload) => {
            (Some(payload.channel_id.clone()), Some(payload.user_id.clone()))
        }
        GatewayEvent::ComponentInteraction(event) => {
            (Some(event.channel_id.clone()), Some(event.user_id.clone()))
        }
        GatewayEvent::Unsupported { .. } => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use crate::events::{
        ComponentInteractionEvent, EventDispatcher, GatewayEnvelope, GatewayEvent,
    };

    use super::{GatewayRunner, GatewayTransport, ReconnectPolicy, TransportError};

    #[derive(Default)]
    struct ScriptedTransport {
        state: Mutex<ScriptedState>,
    }

    #[derive(Default)]
    struct ScriptedState {
        connect_results: VecDeque<Result<(), TransportError>>,
        envelopes: VecDeque<Result<Option<GatewayEnvelope>, TransportError>>,
        disconnect_results: VecDeque<Result<(), TransportError>>,
        connect_attempts: usize,
        acknowledgements: Vec<String>,
        disconnect_calls: usize,
    }

    impl ScriptedTransport {
        fn with_script(
            connect_results: Vec<Result<(), TransportError>>,
            envelopes: Vec<Result<Option<GatewayEnvelope>, TransportError>>,
            disconnect_results: Vec<Result<(), TransportError>>,
        ) -> Self {
            Self {
                state: Mutex::new(ScriptedState {
                    connect_results: connect_results.into(),
                    envelopes: envelopes.into(),
                    disconnect_results: disconnect_results.into(),
                    connect_attempts: 0,
                    acknowledgements: Vec::new(),
                    disconnect_calls: 0,
                }),
            }
        }

        async fn connect_attempts(&self) -> usize {
            self.state.lock().await.connect_attempts
        }

        async fn acknowledgements(&self) -> Vec<String> {
            self.state.lock().await.acknowledgements.clone()
        }
    }

    #[async_trait]
    impl GatewayTransport for ScriptedTransport {
        async fn connect(&self) -> Result<(), TransportError> {
            let mut state = self.state.lock().await;
            state.connect_attempts += 1;
            state.connect_results.pop_front().unwrap_or(Ok(()))
        }

        async fn next_envelope(&self) -> Result<Option<GatewayEnvelope>, TransportError> {
            let mut state = self.state.lock().await;
            state.envelopes.pop_front().unwrap_or(Ok(None))
        }

        async fn acknowledge(&self, envelope_id: &str) -> Result<(), TransportError> {
            let mut state = self.state.lock().await;
            state.acknowledgements.push(envelope_id.to_owned());
            Ok(())
        }

        async fn disconnect(&self) -> Result<(), TransportError> {
            let mut state = self.state.lock().await;
            state.disconnect_calls += 1;
            state.disconnect_results.pop_front().unwrap_or(Ok(()))
        }
    }

    fn interaction_envelope(envelope_id: &str) -> GatewayEnvelope {
        GatewayEnvelope {
            envelope_id: envelope_id.to_owned(),
            event: GatewayEvent::ComponentInteraction(ComponentInteractionEvent {
                channel_id: "C1".to_owned(),
                message_id: "M1".to_owned(),
                user_id: "U1".to_owned(),
                custom_id: "aram.join.v1".to_owned(),
                request_id: "req-1".to_owned(),
            }),
        }
    }

    #[tokio::test]
    async fn reconnects_after_initial_connect_failure() {
        let transport = Arc::new(ScriptedTransport::with_script(
            vec![Err(TransportError::Connect("network down".to_owned())), Ok(())],
            vec![Ok(Some(interaction_envelope("env-1"))), Ok(None)],
            vec![Ok(())],
        ));

        let runner = GatewayRunner::new(
            transport.clone(),
            EventDispatcher::default(),
            ReconnectPolicy { max_retries: 2, base_delay_ms: 0, max_delay_ms: 0 },
        );

        runner.start().await.expect("runner should not fail");

        assert_eq!(transport.connect_attempts().await, 2);
        assert_eq!(transport.acknowledgements().await, vec!["env-1"]);
    }

    #[tokio::test]
    async fn exhausts_retries_without_crashing() {
        let transport = Arc::new(ScriptedTransport::with_script(
            vec![
                Err(TransportError::Connect("fail-1".to_owned())),
                Err(TransportError::Connect("fail-2".to_owned())),
                Err(TransportError::Connect("fail-3".to_owned())),
            ],
            vec![],
            vec![],
        ));

        let runner = GatewayRunner::new(
            transport.clone(),
            EventDispatcher::default(),
            ReconnectPolicy { max_retries: 2, base_delay_ms: 0, max_delay_ms: 0 },
        );

        runner.start().await.expect("runner should degrade gracefully");
        assert_eq!(transport.connect_attempts().await, 3);
    }

    #[tokio::test]
    async fn envelopes_are_acknowledged_before_dispatch_errors_matter() {
        let transport = Arc::new(ScriptedTransport::with_script(
            vec![Ok(())],
            vec![
                Ok(Some(interaction_envelope("env-1"))),
                Ok(Some(interaction_envelope("env-2"))),
                Ok(None),
            ],
            vec![Ok(())],
        ));

        let runner = GatewayRunner::new(
            transport.clone(),
            EventDispatcher::default(),
            ReconnectPolicy { max_retries: 0, base_delay_ms: 0, max_delay_ms: 0 },
        );

        runner.start().await.expect("runner should not fail");
        assert_eq!(transport.acknowledgements().await, vec!["env-1", "env-2"]);
    }

    #[test]
    fn backoff_grows_exponentially_and_caps_at_the_maximum() {
        let policy = ReconnectPolicy { max_retries: 10, base_delay_ms: 100, max_delay_ms: 1_000 };

        assert_eq!(policy.backoff(0), Duration::from_millis(100));
        assert_eq!(policy.backoff(1), Duration::from_millis(200));
        assert_eq!(policy.backoff(2), Duration::from_millis(400));
        assert_eq!(policy.backoff(10), Duration::from_millis(1_000));
    }

    #[test]
    fn correlation_fields_extract_scope_and_actor() {
        let (scope, actor) = super::correlation_fields(&interaction_envelope("env-9"));
        assert_eq!(scope.as_deref(), Some("C1"));
        assert_eq!(actor.as_deref(), Some("U1"));
    }
}
