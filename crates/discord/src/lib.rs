//! Discord Integration - gateway bot interface
//!
//! This crate provides the Discord-facing surface for araminator:
//! - **Gateway** (`gateway`) - event-stream connection with reconnect logic
//! - **Slash Commands** (`commands`) - `/aram`, `/end_aram`, `/register`, ...
//! - **Events** (`events`) - command and button-interaction dispatch
//! - **Embeds** (`embeds`) - rich message builders (embeds, buttons)
//!
//! No business logic lives here: user gestures are translated into calls on
//! the service traits, and the render-agnostic summaries coming back are
//! translated into renderable messages. Failures from the session core arrive
//! as typed errors and leave as transient, ephemeral notices.
//!
//! # Key Types
//!
//! - `GatewayRunner` - event loop with reconnection policy
//! - `EventDispatcher` - routes envelopes to registered handlers
//! - `MessageTemplate` - embed + button payload for one message
//! - `SessionCommandService` / `SessionActionService` - handler traits

pub mod commands;
pub mod embeds;
pub mod events;
pub mod gateway;
