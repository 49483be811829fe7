//! Message protocol definitions
//!
//! JSON request/response protocol using Serde's tagged enum. Every request
//! frame is answered by exactly one response frame, in order.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::types::ClientId;

/// Client → Server request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientRequest {
    /// Register and receive a client id
    Join,
    /// Broadcast a line to every other client
    SendMessage { id: ClientId, text: String },
    /// Fetch and clear the pending lines of a client
    Stream { id: ClientId },
}

/// Server → Client response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerResponse {
    /// Join succeeded
    Joined { id: ClientId },
    /// SendMessage succeeded
    MessageSent,
    /// Lines drained by Stream, oldest first
    Messages { messages: Vec<String> },
    /// Request failed
    Error { code: ErrorCode, message: String },
}

/// Error codes for ServerResponse::Error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Referenced client id was never issued
    ClientNotFound,
    /// Frame was not a valid request
    InvalidRequest,
    /// Server-side failure
    Internal,
}

/// Convert AppError to ServerResponse for client notification
impl From<AppError> for ServerResponse {
    fn from(err: AppError) -> Self {
        let code = match &err {
            AppError::ClientNotFound(_) => ErrorCode::ClientNotFound,
            AppError::Json(_) => ErrorCode::InvalidRequest,
            _ => ErrorCode::Internal,
        };
        let message = match &err {
            AppError::Json(e) => format!("Invalid request format: {}", e),
            AppError::ClientNotFound(_) => err.to_string(),
            // Transport details stay on the server
            _ => "Internal error".to_string(),
        };
        ServerResponse::Error { code, message }
    }
}
