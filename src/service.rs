//! Chat service handle
//!
//! The three externally invocable operations (Join, SendMessage, Stream).
//! A `ChatService` is a cloneable handle onto the `ChatServer` actor; every
//! call is a request/response round trip over the command channel.

use tokio::sync::{mpsc, oneshot};

use crate::config::ServiceConfig;
use crate::error::AppError;
use crate::server::{ChatServer, ServerCommand};
use crate::types::ClientId;

#[derive(Debug, Clone)]
pub struct ChatService {
    commands: mpsc::Sender<ServerCommand>,
}

impl ChatService {
    /// Wrap the sending half of an actor's command channel
    pub fn new(commands: mpsc::Sender<ServerCommand>) -> Self {
        Self { commands }
    }

    /// Start a `ChatServer` actor on the current runtime and return its handle
    pub fn spawn(config: &ServiceConfig, buffer: usize) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(buffer);
        tokio::spawn(ChatServer::new(config, cmd_rx).run());
        Self::new(cmd_tx)
    }

    /// Register a new client and announce it to everybody else
    pub async fn join(&self) -> Result<ClientId, AppError> {
        self.call(|reply| ServerCommand::Join { reply }).await
    }

    /// Broadcast `text` from `id` to every other client
    pub async fn send_message(
        &self,
        id: ClientId,
        text: impl Into<String>,
    ) -> Result<(), AppError> {
        let text = text.into();
        self.call(|reply| ServerCommand::SendMessage { id, text, reply })
            .await?
    }

    /// Take every line currently queued for `id`
    pub async fn stream(&self, id: ClientId) -> Result<Vec<String>, AppError> {
        self.call(|reply| ServerCommand::Stream { id, reply })
            .await?
    }

    async fn call<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> ServerCommand,
    ) -> Result<T, AppError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(command(reply_tx))
            .await
            .map_err(|_| AppError::ServerClosed)?;
        reply_rx.await.map_err(|_| AppError::ServerClosed)
    }
}
