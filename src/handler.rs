//! WebSocket connection handler
//!
//! Accepts TCP connections, performs the WebSocket handshake and maps each
//! request frame onto one `ChatService` call.

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::error::AppError;
use crate::message::{ClientRequest, ServerResponse};
use crate::service::ChatService;

/// Accept connections forever, one task per connection
pub async fn serve(listener: TcpListener, service: ChatService) -> Result<(), AppError> {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                info!("New connection from {}", addr);
                let service = service.clone();

                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, service).await {
                        error!("Connection handler error: {}", e);
                    }
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}

/// Handle a new TCP connection
///
/// Requests on one connection are answered in order. Closing the connection
/// does not unregister any client.
pub async fn handle_connection(stream: TcpStream, service: ChatService) -> Result<(), AppError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    debug!("New TCP connection from {}", peer_addr);

    // WebSocket handshake
    let mut ws_stream = tokio_tungstenite::accept_async(stream).await?;

    while let Some(msg_result) = ws_stream.next().await {
        let text = match msg_result {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => {
                debug!("{} sent close frame", peer_addr);
                break;
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                // Pong is handled automatically by tungstenite
                continue;
            }
            Ok(_) => {
                // Binary or other message types - ignore
                continue;
            }
            Err(e) => {
                error!("WebSocket error for {}: {}", peer_addr, e);
                break;
            }
        };

        let response = match serde_json::from_str::<ClientRequest>(&text) {
            Ok(request) => match dispatch_request(&service, request).await {
                Ok(response) => response,
                Err(AppError::ServerClosed) => {
                    error!("Chat server closed, dropping {}", peer_addr);
                    return Err(AppError::ServerClosed);
                }
                Err(e) => e.into(),
            },
            Err(e) => {
                warn!("Invalid JSON from {}: {}", peer_addr, e);
                AppError::from(e).into()
            }
        };

        let json = serde_json::to_string(&response)?;
        ws_stream.send(Message::Text(json.into())).await?;
    }

    info!("Connection from {} closed", peer_addr);

    Ok(())
}

/// Route a decoded request to the matching service operation
async fn dispatch_request(
    service: &ChatService,
    request: ClientRequest,
) -> Result<ServerResponse, AppError> {
    match request {
        ClientRequest::Join => {
            let id = service.join().await?;
            Ok(ServerResponse::Joined { id })
        }
        ClientRequest::SendMessage { id, text } => {
            service.send_message(id, text).await?;
            Ok(ServerResponse::MessageSent)
        }
        ClientRequest::Stream { id } => {
            let messages = service.stream(id).await?;
            Ok(ServerResponse::Messages { messages })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::message::ErrorCode;
    use crate::types::ClientId;

    #[tokio::test]
    async fn test_dispatch_request_routes_operations() {
        let service = ChatService::spawn(&ServiceConfig::default(), 16);

        let joined = dispatch_request(&service, ClientRequest::Join).await.unwrap();
        assert_eq!(joined, ServerResponse::Joined { id: ClientId(1) });

        let sent = dispatch_request(
            &service,
            ClientRequest::SendMessage {
                id: ClientId(1),
                text: "hi".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(sent, ServerResponse::MessageSent);

        let streamed = dispatch_request(&service, ClientRequest::Stream { id: ClientId(1) })
            .await
            .unwrap();
        assert_eq!(streamed, ServerResponse::Messages { messages: vec![] });
    }

    #[tokio::test]
    async fn test_dispatch_request_unknown_stream() {
        let service = ChatService::spawn(&ServiceConfig::default(), 16);

        let err = dispatch_request(&service, ClientRequest::Stream { id: ClientId(3) })
            .await
            .unwrap_err();
        let response: ServerResponse = err.into();
        assert!(matches!(
            response,
            ServerResponse::Error {
                code: ErrorCode::ClientNotFound,
                ..
            }
        ));
    }
}
