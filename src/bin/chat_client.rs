//! Terminal chat client
//!
//! Joins once, then polls its mailbox on a fixed interval while forwarding
//! typed lines. `exit` or end of input leaves.

use std::io::Write;
use std::time::Duration;

use clap::Parser;
use tokio::io::{stdin, AsyncBufReadExt, BufReader};
use tokio::time::{interval, MissedTickBehavior};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use poll_chat::{classify_input, is_transient_input_error, ChatClient, ClientConfig, InputLine};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Quiet by default so log lines don't interleave with chat output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("poll_chat=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::parse();

    let mut client = ChatClient::connect(&config.url).await?;
    let id = client.join().await?;
    println!("You joined as User {}", id);

    let mut poll = interval(Duration::from_millis(config.poll_interval_ms));
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut lines = BufReader::new(stdin()).lines();
    prompt();

    loop {
        tokio::select! {
            _ = poll.tick() => {
                match client.stream(id).await {
                    Ok(messages) if !messages.is_empty() => {
                        println!();
                        for message in messages {
                            println!("{}", message);
                        }
                        prompt();
                    }
                    Ok(_) => {}
                    Err(e) => warn!("Poll failed: {}", e),
                }
            }
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) if is_transient_input_error(&e) => {
                        warn!("Skipped unreadable input line: {}", e);
                        prompt();
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                };
                match classify_input(&line) {
                    InputLine::Exit => {
                        println!("Exiting...");
                        break;
                    }
                    InputLine::Skip => {}
                    InputLine::Message(text) => {
                        if let Err(e) = client.send_message(id, text).await {
                            warn!("Send failed: {}", e);
                        }
                    }
                }
                prompt();
            }
        }
    }

    let _ = client.close().await;

    Ok(())
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}
