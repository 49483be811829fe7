//! Command line configuration for the server and client binaries

use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::{Args, Parser};

use crate::mailbox::{OverflowPolicy, DEFAULT_MAILBOX_CAPACITY};

/// Default server address
pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";

/// Default WebSocket URL the client dials
pub const DEFAULT_URL: &str = "ws://127.0.0.1:8080";

/// Channel buffer size for server commands
pub const CHANNEL_BUFFER_SIZE: usize = 256;

/// Default delay between two polls of the client's mailbox
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Behaviour of the chat core
#[derive(Debug, Clone, Args)]
pub struct ServiceConfig {
    /// Lines each client's mailbox holds between polls
    #[arg(long, default_value_t = DEFAULT_MAILBOX_CAPACITY, value_parser = parse_nonzero)]
    pub mailbox_capacity: usize,

    /// What a full mailbox does with a new line
    #[arg(long, default_value = "drop-newest", value_parser = overflow_parser())]
    pub overflow: OverflowPolicy,

    /// Reject messages whose sender id was never issued
    #[arg(long)]
    pub strict_sender: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
            overflow: OverflowPolicy::default(),
            strict_sender: false,
        }
    }
}

/// Server binary arguments
#[derive(Debug, Clone, Parser)]
#[command(name = "poll_chat")]
#[command(about = "Broadcast chat server with polled mailboxes")]
#[command(version)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(default_value = DEFAULT_ADDR)]
    pub addr: String,

    /// Buffer size of the ChatServer command channel
    #[arg(long, default_value_t = CHANNEL_BUFFER_SIZE, value_parser = parse_nonzero)]
    pub command_buffer: usize,

    #[command(flatten)]
    pub service: ServiceConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            command_buffer: CHANNEL_BUFFER_SIZE,
            service: ServiceConfig::default(),
        }
    }
}

/// Client binary arguments
#[derive(Debug, Clone, Parser)]
#[command(name = "chat_client")]
#[command(about = "Terminal client for the poll_chat server")]
#[command(version)]
pub struct ClientConfig {
    /// WebSocket URL of the server
    #[arg(long, default_value = DEFAULT_URL)]
    pub url: String,

    /// Milliseconds between two mailbox polls
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_MS, value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval_ms: u64,
}

/// Sizes that must be at least 1 (mailbox capacity, channel buffer)
fn parse_nonzero(raw: &str) -> Result<usize, String> {
    let value: usize = raw
        .parse()
        .map_err(|e| format!("invalid value '{}': {}", raw, e))?;
    if value == 0 {
        return Err("value must be at least 1".to_string());
    }
    Ok(value)
}

fn overflow_parser() -> impl TypedValueParser<Value = OverflowPolicy> {
    PossibleValuesParser::new(["drop-newest", "drop-oldest"]).map(|raw| match raw.as_str() {
        "drop-oldest" => OverflowPolicy::DropOldest,
        _ => OverflowPolicy::DropNewest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::try_parse_from(["poll_chat"]).unwrap();
        assert_eq!(config.addr, DEFAULT_ADDR);
        assert_eq!(config.command_buffer, CHANNEL_BUFFER_SIZE);
        assert_eq!(config.service.mailbox_capacity, DEFAULT_MAILBOX_CAPACITY);
        assert_eq!(config.service.overflow, OverflowPolicy::DropNewest);
        assert!(!config.service.strict_sender);
    }

    #[test]
    fn test_server_config_overrides() {
        let config = ServerConfig::try_parse_from([
            "poll_chat",
            "0.0.0.0:9000",
            "--mailbox-capacity",
            "25",
            "--overflow",
            "drop-oldest",
            "--strict-sender",
        ])
        .unwrap();

        assert_eq!(config.addr, "0.0.0.0:9000");
        assert_eq!(config.service.mailbox_capacity, 25);
        assert_eq!(config.service.overflow, OverflowPolicy::DropOldest);
        assert!(config.service.strict_sender);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = ServerConfig::try_parse_from(["poll_chat", "--mailbox-capacity", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_command_buffer_rejected() {
        let result = ServerConfig::try_parse_from(["poll_chat", "--command-buffer", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_overflow_rejected() {
        let result = ServerConfig::try_parse_from(["poll_chat", "--overflow", "drop-random"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let result = ClientConfig::try_parse_from(["chat_client", "--poll-interval-ms", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_client_config_defaults() {
        let config = ClientConfig::try_parse_from(["chat_client"]).unwrap();
        assert_eq!(config.url, DEFAULT_URL);
        assert_eq!(config.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
    }
}
