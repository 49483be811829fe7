//! ChatServer Actor implementation
//!
//! The central actor that owns the client registry and dispatcher.
//! Commands arrive over an mpsc channel and are processed one at a time,
//! so every operation is atomic with respect to every other.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::config::ServiceConfig;
use crate::dispatcher::{Dispatcher, Notice};
use crate::error::AppError;
use crate::registry::ClientRegistry;
use crate::types::ClientId;

/// Commands sent from the service handle to the ChatServer actor
///
/// Each command carries the oneshot sender its result is returned on.
#[derive(Debug)]
pub enum ServerCommand {
    /// Register a new client and announce it
    Join { reply: oneshot::Sender<ClientId> },
    /// Broadcast a line from `id` to everybody else
    SendMessage {
        id: ClientId,
        text: String,
        reply: oneshot::Sender<Result<(), AppError>>,
    },
    /// Drain the mailbox of `id`
    Stream {
        id: ClientId,
        reply: oneshot::Sender<Result<Vec<String>, AppError>>,
    },
}

/// The main ChatServer actor
pub struct ChatServer {
    dispatcher: Dispatcher,
    /// Reject SendMessage from ids the registry never issued
    strict_sender: bool,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl ChatServer {
    /// Create a new ChatServer with the given configuration and command receiver
    pub fn new(config: &ServiceConfig, receiver: mpsc::Receiver<ServerCommand>) -> Self {
        let registry = ClientRegistry::new(config.mailbox_capacity, config.overflow);
        Self {
            dispatcher: Dispatcher::new(registry),
            strict_sender: config.strict_sender,
            receiver,
        }
    }

    /// Run the ChatServer event loop
    ///
    /// Continuously receives and processes commands until all senders are dropped.
    pub async fn run(mut self) {
        info!("ChatServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        info!("ChatServer shutting down");
    }

    /// Process a single command
    ///
    /// A dropped reply receiver means the caller gave up; the state change
    /// stands either way.
    fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Join { reply } => {
                let _ = reply.send(self.handle_join());
            }
            ServerCommand::SendMessage { id, text, reply } => {
                let _ = reply.send(self.handle_send_message(id, &text));
            }
            ServerCommand::Stream { id, reply } => {
                let _ = reply.send(self.handle_stream(id));
            }
        }
    }

    /// Handle a new client joining
    fn handle_join(&mut self) -> ClientId {
        let id = self.dispatcher.registry_mut().register();
        info!("Client {} joined", id);

        let report = self.dispatcher.broadcast(id, Notice::Joined);
        debug!(
            "Join notice for {} offered to {} clients",
            id, report.recipients
        );
        id
    }

    /// Handle a chat line
    ///
    /// Unless `strict_sender` is set, the sender id is not checked: an id
    /// that was never issued still broadcasts.
    fn handle_send_message(&mut self, id: ClientId, text: &str) -> Result<(), AppError> {
        if !self.dispatcher.registry().contains(id) {
            if self.strict_sender {
                warn!("Rejected message from unknown client {}", id);
                return Err(AppError::ClientNotFound(id));
            }
            debug!("Message from unregistered client {} passed through", id);
        }

        let report = self.dispatcher.broadcast(id, Notice::Said(text));
        debug!(
            "Client {} message offered to {} clients ({} dropped)",
            id, report.recipients, report.dropped
        );
        Ok(())
    }

    /// Handle a mailbox poll
    fn handle_stream(&mut self, id: ClientId) -> Result<Vec<String>, AppError> {
        let lines = self.dispatcher.drain(id)?;
        if !lines.is_empty() {
            debug!("Client {} drained {} lines", id, lines.len());
        }
        Ok(lines)
    }
}
