//! Streaming completion example: prints the reply as it arrives.
//!
//! Run with:
//! ```bash
//! export OPENAI_API_KEY="your-api-key"
//! cargo run --example stream
//! ```

use std::io::Write;

use continuo::{start, Configuration, Conversation, Message};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Get API key from environment
    let api_key =
        std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY environment variable must be set");

    let config = Configuration::new(api_key)
        .with_temperature(0.9)
        .with_timeout(std::time::Duration::from_secs(60));

    let mut conversation = Conversation::new();
    conversation.push(Message::system("You are a concise writing assistant."));
    conversation.push(Message::user("Write a haiku about Rust programming."));

    println!("Streaming response...\n");

    let session = start(&conversation, &config, |delta| {
        print!("{delta}");
        // Flush stdout to show text immediately
        let _ = std::io::stdout().flush();
    })?;

    let outcome = session.result().await;

    println!("\n\n=== Stream Complete ===");
    println!("State: {}", outcome.state);
    if let Some(error) = outcome.error {
        eprintln!("Error: {error}");
    }
    for warning in &outcome.warnings {
        eprintln!("Warning: {warning}");
    }

    Ok(())
}
