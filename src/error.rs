//! Error types for the chat server
//!
//! One application error enum covers transport failures (WebSocket, JSON, IO),
//! the single domain error `ClientNotFound`, and client-side protocol errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

use crate::message::ErrorCode;
use crate::types::ClientId;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    /// WebSocket protocol error (fatal for the connection)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error (fatal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The ChatServer actor is gone (command channel or reply dropped)
    #[error("Chat server closed")]
    ServerClosed,

    /// The referenced client id was never issued by the registry
    #[error("client {0} not found")]
    ClientNotFound(ClientId),

    /// The server answered a request with an error response
    #[error("server error ({code:?}): {message}")]
    Remote { code: ErrorCode, message: String },

    /// The server answered with a response of the wrong kind
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The peer closed the WebSocket before answering
    #[error("Connection closed")]
    ConnectionClosed,
}
