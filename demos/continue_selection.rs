//! One-shot "continue this text" example, the editor-integration flow:
//! the open document rides along as ambient context and the selection is
//! the text to continue.
//!
//! Run with:
//! ```bash
//! export OPENAI_API_KEY="your-api-key"
//! cargo run --example continue_selection
//! ```

use continuo::{complete, Configuration, Conversation, Message};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let api_key =
        std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY environment variable must be set");

    let config = Configuration::new(api_key).with_max_tokens(100);

    let document = "# Field notes\n\nThe lighthouse keeper logs the weather at dawn.";
    let selection = "The lighthouse keeper logs the weather at dawn.";

    let mut conversation = Conversation::new().with_context(document);
    conversation.push(Message::user(format!("Continue this text: {selection}")));

    let message = complete(&conversation, &config).await?;
    println!("{}", message.content);

    Ok(())
}
