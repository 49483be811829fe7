//! Chat client
//!
//! A WebSocket client mirroring the three service operations, plus the
//! input classification used by the terminal loop.

use std::io;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::debug;

use crate::error::AppError;
use crate::message::{ClientRequest, ServerResponse};
use crate::types::ClientId;

/// Typing this ends the client loop
pub const EXIT_COMMAND: &str = "exit";

/// What a line of user input asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputLine<'a> {
    /// Leave the chat
    Exit,
    /// Blank line, nothing to send
    Skip,
    /// Send this text
    Message(&'a str),
}

/// Whether a failed stdin read only spoils the current line
///
/// Invalid UTF-8 is consumed by the reader, so the next line can still be read.
pub fn is_transient_input_error(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::InvalidData
}

/// Classify one line of user input (surrounding whitespace ignored)
pub fn classify_input(line: &str) -> InputLine<'_> {
    match line.trim() {
        EXIT_COMMAND => InputLine::Exit,
        "" => InputLine::Skip,
        text => InputLine::Message(text),
    }
}

/// Connected chat client
///
/// Calls are strictly sequential: one request frame, then one response frame.
pub struct ChatClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl ChatClient {
    /// Dial the server at `url` (e.g. `ws://127.0.0.1:8080`)
    pub async fn connect(url: &str) -> Result<Self, AppError> {
        let (ws, _) = tokio_tungstenite::connect_async(url).await?;
        debug!("Connected to {}", url);
        Ok(Self { ws })
    }

    /// Register with the server
    pub async fn join(&mut self) -> Result<ClientId, AppError> {
        match self.call(&ClientRequest::Join).await? {
            ServerResponse::Joined { id } => Ok(id),
            other => Err(unexpected(other)),
        }
    }

    /// Broadcast `text` as client `id`
    pub async fn send_message(&mut self, id: ClientId, text: &str) -> Result<(), AppError> {
        let request = ClientRequest::SendMessage {
            id,
            text: text.to_string(),
        };
        match self.call(&request).await? {
            ServerResponse::MessageSent => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    /// Fetch and clear the lines queued for `id`
    pub async fn stream(&mut self, id: ClientId) -> Result<Vec<String>, AppError> {
        match self.call(&ClientRequest::Stream { id }).await? {
            ServerResponse::Messages { messages } => Ok(messages),
            other => Err(unexpected(other)),
        }
    }

    /// Send a close frame
    pub async fn close(mut self) -> Result<(), AppError> {
        self.ws.close(None).await?;
        Ok(())
    }

    /// One request/response round trip; error responses become `AppError::Remote`
    async fn call(&mut self, request: &ClientRequest) -> Result<ServerResponse, AppError> {
        let json = serde_json::to_string(request)?;
        self.ws.send(Message::Text(json.into())).await?;

        loop {
            match self.ws.next().await {
                Some(Ok(Message::Text(text))) => {
                    return match serde_json::from_str::<ServerResponse>(&text)? {
                        ServerResponse::Error { code, message } => {
                            Err(AppError::Remote { code, message })
                        }
                        response => Ok(response),
                    };
                }
                Some(Ok(Message::Close(_))) | None => return Err(AppError::ConnectionClosed),
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
            }
        }
    }
}

fn unexpected(response: ServerResponse) -> AppError {
    AppError::UnexpectedResponse(format!("{:?}", response))
}
