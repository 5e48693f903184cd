//! Auth event infrastructure for the portfolio client.
//!
//! This crate provides the event system that decouples the request client
//! from whatever reacts to session changes (a CLI printing a notice, a UI
//! redirecting to its login screen).
//!
//! # Architecture
//!
//! - **AuthEvent**: Enum representing every session-level change
//! - **EventHandler**: Trait for implementing event handlers
//! - **EventPublisher**: Publishes events to registered handlers
//!
//! This crate has no dependencies on internal crates, so both the auth
//! crate and the application can use it without cycles.

use async_trait::async_trait;
use log::*;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoutReason {
    /// Authorization was lost and could not be renewed.
    SessionExpired,
    /// The user logged out explicitly.
    UserRequested,
}

/// Session events emitted by the auth layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthEvent {
    /// Emitted after a login or registration stored a new token pair.
    LoggedIn { email: String },
    /// Emitted after the access token was renewed with the refresh token.
    TokenRefreshed,
    /// Emitted when stored credentials have been cleared.
    /// Observers are expected to send the user back to a login prompt.
    LoggedOut { reason: LogoutReason },
}

impl AuthEvent {
    /// Stable event name, matching the names the web frontend dispatches.
    pub fn event_type(&self) -> &'static str {
        match self {
            AuthEvent::LoggedIn { .. } => "auth:login",
            AuthEvent::TokenRefreshed => "auth:refresh",
            AuthEvent::LoggedOut { .. } => "auth:logout",
        }
    }
}

/// Trait for handling auth events.
/// Implementations can perform side effects like printing a notice,
/// clearing caches, logging, etc.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &AuthEvent);
}

/// Publishes auth events to registered handlers.
/// Handlers are called sequentially in registration order.
#[derive(Clone)]
pub struct EventPublisher {
    handlers: Arc<Vec<Arc<dyn EventHandler>>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
        }
    }

    /// Register a new event handler.
    /// Note: This creates a new publisher instance with the additional handler.
    /// Store the returned publisher wherever the client is constructed.
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        let mut handlers = (*self.handlers).clone();
        handlers.push(handler);
        self.handlers = Arc::new(handlers);
        self
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Publish an event to all registered handlers.
    pub async fn publish(&self, event: AuthEvent) {
        debug!("Publishing {} event", event.event_type());
        for handler in self.handlers.iter() {
            handler.handle(&event).await;
        }
    }

    /// Publish an event from a background task after `delay`.
    ///
    /// Returns immediately, so the caller finishes its own error handling
    /// before any handler runs. Outside a Tokio runtime the event is dropped.
    pub fn publish_detached(&self, event: AuthEvent, delay: Duration) {
        if self.handlers.is_empty() {
            return;
        }

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!(
                    "No async runtime available, dropping {} event",
                    event.event_type()
                );
                return;
            }
        };

        let publisher = self.clone();
        handle.spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            publisher.publish(event).await;
        });
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}
