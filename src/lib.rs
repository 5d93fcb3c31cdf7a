//! # continuo - Streaming assistant core for editor integrations
//!
//! A small, pragmatic Rust library that sends conversation context to a
//! chat-completions endpoint and renders the reply incrementally as it
//! streams back.
//!
//! ## Features
//! - Async-first, tokio compatible
//! - Incremental server-sent-event consumption with per-delta callbacks
//! - UTF-8 and line reassembly across arbitrary chunk boundaries
//! - Cooperative cancellation with the partial reply retained
//! - Malformed events skipped and reported, never fatal
//!
//! ## Architecture
//!
//! One request is one [`Session`]: [`start`] builds the payload from a
//! [`Conversation`] and a [`Configuration`], spawns a background task,
//! and streams content fragments to a callback while the accumulated
//! assistant [`Message`] grows. The pipeline behind it is three small
//! stages, each usable on its own:
//!
//! 1. [`decode::Utf8Decoder`]: raw byte chunks to text fragments
//! 2. [`frame::LineFramer`]: text fragments to whole protocol lines
//! 3. [`event::extract`]: one line to delta, done, ignore, or malformed
//!
//! ## Example
//! ```no_run
//! use continuo::{start, Configuration, Conversation, Message};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Configuration::new("your-api-key")
//!         .with_model("gpt-4o-mini");
//!
//!     let mut conversation = Conversation::new()
//!         .with_context("The quick brown fox");
//!     conversation.push(Message::user("Continue this text."));
//!
//!     let session = start(&conversation, &config, |delta| {
//!         print!("{delta}");
//!     })?;
//!
//!     let outcome = session.result().await;
//!     println!("\n[{}] {} chars", outcome.state, outcome.message.content.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod decode;
pub mod error;
pub mod event;
pub mod frame;
pub mod http;
pub mod model;
pub mod request;
pub mod session;

// Re-exports for convenience
pub use config::{Configuration, SecretString};
pub use error::{DecodeWarning, Error};
pub use event::Extraction;
pub use model::{Conversation, Message, Role};
pub use session::{complete, start, Session, SessionOutcome, SessionState};
