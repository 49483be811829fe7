//! Polled Broadcast Chat Server Library
//!
//! A multi-client broadcast chat built with tokio-tungstenite. Clients join,
//! send short lines, and collect everyone else's lines by polling their own
//! bounded mailbox instead of holding a push stream.
//!
//! # Operations
//! - `Join`: mint a client id and announce it to the others
//! - `SendMessage`: broadcast a line to every mailbox but the sender's
//! - `Stream`: drain the caller's mailbox
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `ChatServer` is the central actor owning the registry and mailboxes
//! - `ChatService` is the cloneable handle every connection calls through
//! - Commands are processed one at a time, so no locks are needed
//! - Mailboxes hold at most a fixed number of lines; overflow is dropped
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use poll_chat::{serve, ChatService, ServiceConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await.unwrap();
//!     let service = ChatService::spawn(&ServiceConfig::default(), 256);
//!     serve(listener, service).await.unwrap();
//! }
//! ```

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod mailbox;
pub mod message;
pub mod registry;
pub mod server;
pub mod service;
pub mod types;

// Re-export main types for convenience
pub use client::{classify_input, is_transient_input_error, ChatClient, InputLine};
pub use config::{ClientConfig, ServerConfig, ServiceConfig};
pub use dispatcher::{BroadcastReport, Dispatcher, Notice};
pub use error::AppError;
pub use handler::{handle_connection, serve};
pub use mailbox::{Mailbox, OverflowPolicy, DEFAULT_MAILBOX_CAPACITY};
pub use message::{ClientRequest, ErrorCode, ServerResponse};
pub use registry::ClientRegistry;
pub use server::{ChatServer, ServerCommand};
pub use service::ChatService;
pub use types::ClientId;
