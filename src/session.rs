//! Streaming session orchestration.
//!
//! [`start`] builds the request, spawns one background task, and hands
//! back a [`Session`] handle. The task drives the response body through
//! the decode/frame/extract pipeline, appending each content delta to
//! the in-flight assistant message and invoking the caller's callback in
//! strict arrival order. [`Session::result`] waits for the terminal
//! [`SessionOutcome`].

use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::config::Configuration;
use crate::decode::Utf8Decoder;
use crate::error::{DecodeWarning, Error};
use crate::event::{self, Extraction};
use crate::frame::LineFramer;
use crate::http::{add_extra_headers, build_http_client};
use crate::model::{Conversation, Message};
use crate::request;

/// Lifecycle of one streaming session.
///
/// `Idle` is the notional pre-start state; a live [`Session`] begins at
/// `Awaiting`. States only ever move forward, and a session is one-shot:
/// a new request means a new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    /// Request sent, response head not yet received.
    Awaiting,
    /// Body bytes are arriving.
    Streaming,
    Completed,
    Failed,
    Cancelled,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Completed | SessionState::Failed | SessionState::Cancelled
        )
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Awaiting => "awaiting",
            SessionState::Streaming => "streaming",
            SessionState::Completed => "completed",
            SessionState::Failed => "failed",
            SessionState::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Terminal result of a session.
///
/// The message holds everything delivered through the callback, whatever
/// the terminal state: a cancelled or failed session still returns the
/// partial text.
#[derive(Debug)]
pub struct SessionOutcome {
    /// Accumulated assistant message.
    pub message: Message,

    /// Terminal state: `Completed`, `Failed`, or `Cancelled`.
    pub state: SessionState,

    /// The fatal error when `state` is `Failed`.
    pub error: Option<Error>,

    /// Malformed event lines skipped along the way.
    pub warnings: Vec<DecodeWarning>,
}

impl SessionOutcome {
    fn completed(content: String, warnings: Vec<DecodeWarning>) -> Self {
        Self {
            message: Message::assistant(content),
            state: SessionState::Completed,
            error: None,
            warnings,
        }
    }

    fn cancelled(content: String, warnings: Vec<DecodeWarning>) -> Self {
        Self {
            message: Message::assistant(content),
            state: SessionState::Cancelled,
            error: None,
            warnings,
        }
    }

    fn failed(content: String, warnings: Vec<DecodeWarning>, error: Error) -> Self {
        Self {
            message: Message::assistant(content),
            state: SessionState::Failed,
            error: Some(error),
            warnings,
        }
    }
}

/// Handle to one in-flight streaming session.
///
/// Dropping the handle without calling [`cancel`](Session::cancel)
/// cancels the background task at its next suspend point; abandoned
/// sessions do not hold their connection open.
#[derive(Debug)]
pub struct Session {
    cancel: watch::Sender<bool>,
    state: watch::Receiver<SessionState>,
    handle: JoinHandle<SessionOutcome>,
}

impl Session {
    /// Request cancellation. Returns immediately; the session reaches
    /// `Cancelled` at the next chunk boundary at the latest, and no
    /// callback fires after that. Idempotent, and a no-op once the
    /// session is terminal.
    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Wait for the session to finish and take its outcome.
    pub async fn result(self) -> SessionOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(err) => {
                SessionOutcome::failed(String::new(), Vec::new(), Error::Task(err.to_string()))
            }
        }
    }
}

/// Start a streaming completion for the conversation.
///
/// Fails synchronously on configuration problems; nothing touches the
/// network in that case. Otherwise the request runs on a background
/// task and `on_delta` is invoked once per content fragment, in arrival
/// order. Must be called within a Tokio runtime.
///
/// # Example
/// ```no_run
/// use continuo::{start, Configuration, Conversation, Message};
///
/// # async fn demo() -> Result<(), continuo::Error> {
/// let mut conversation = Conversation::new();
/// conversation.push(Message::user("Continue: the quick brown"));
///
/// let session = start(&conversation, &Configuration::new("sk-..."), |delta| {
///     print!("{delta}");
/// })?;
/// let outcome = session.result().await;
/// println!("{}", outcome.message.content);
/// # Ok(())
/// # }
/// ```
pub fn start<F>(
    conversation: &Conversation,
    config: &Configuration,
    on_delta: F,
) -> Result<Session, Error>
where
    F: FnMut(&str) + Send + 'static,
{
    let payload = request::build(conversation, config)?;
    let client = build_http_client(config)?;

    let mut req = client
        .post(&config.endpoint)
        .header(
            AUTHORIZATION,
            format!("Bearer {}", config.credential.expose_secret()),
        )
        .header(CONTENT_TYPE, "application/json");
    req = add_extra_headers(req, &config.extra_headers);
    let req = req.json(&payload);

    let (cancel_tx, cancel_rx) = watch::channel(false);
    let (state_tx, state_rx) = watch::channel(SessionState::Awaiting);

    debug!(endpoint = %config.endpoint, model = %config.model, "starting streaming session");
    let handle = tokio::spawn(run(req, cancel_rx, state_tx, on_delta));

    Ok(Session {
        cancel: cancel_tx,
        state: state_rx,
        handle,
    })
}

/// Run a session to its terminal state and return the sealed assistant
/// message. A `Failed` outcome becomes `Err`; deltas are accumulated
/// silently instead of being surfaced one by one.
pub async fn complete(
    conversation: &Conversation,
    config: &Configuration,
) -> Result<Message, Error> {
    let session = start(conversation, config, |_| {})?;
    let outcome = session.result().await;
    match outcome.error {
        Some(err) => Err(err),
        None => Ok(outcome.message),
    }
}

async fn run<F>(
    req: reqwest::RequestBuilder,
    mut cancel: watch::Receiver<bool>,
    state: watch::Sender<SessionState>,
    on_delta: F,
) -> SessionOutcome
where
    F: FnMut(&str) + Send + 'static,
{
    let outcome = drive(req, &mut cancel, &state, on_delta).await;
    let _ = state.send(outcome.state);
    debug!(state = %outcome.state, "session finished");
    outcome
}

async fn drive<F>(
    req: reqwest::RequestBuilder,
    cancel: &mut watch::Receiver<bool>,
    state: &watch::Sender<SessionState>,
    on_delta: F,
) -> SessionOutcome
where
    F: FnMut(&str),
{
    // A cancel signal (or a dropped Session handle) wins over the
    // response head; the in-flight request is dropped with the future.
    let response = tokio::select! {
        biased;
        _ = cancel.changed() => {
            debug!("cancelled while awaiting the response");
            return SessionOutcome::cancelled(String::new(), Vec::new());
        }
        response = req.send() => match response {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "request failed");
                return SessionOutcome::failed(String::new(), Vec::new(), err.into());
            }
        },
    };

    let status = response.status();
    if !status.is_success() {
        // Reading the error body is a suspend point too; a server that
        // stalls it must not keep a cancelled session alive.
        let body = tokio::select! {
            biased;
            _ = cancel.changed() => {
                debug!("cancelled while reading the error body");
                return SessionOutcome::cancelled(String::new(), Vec::new());
            }
            body = response.text() => body.unwrap_or_default(),
        };
        warn!(%status, "endpoint refused the request");
        return SessionOutcome::failed(String::new(), Vec::new(), Error::status(status, &body));
    }

    let body = response.bytes_stream().map(|chunk| chunk.map_err(Error::from));
    futures::pin_mut!(body);
    pump(body, cancel, state, on_delta).await
}

/// Drive the chunk pipeline to a terminal outcome.
///
/// Factored over any byte-chunk stream so the protocol behavior is
/// testable without a network.
async fn pump<S, F>(
    mut body: S,
    cancel: &mut watch::Receiver<bool>,
    state: &watch::Sender<SessionState>,
    mut on_delta: F,
) -> SessionOutcome
where
    S: Stream<Item = Result<Bytes, Error>> + Unpin,
    F: FnMut(&str),
{
    let mut decoder = Utf8Decoder::new();
    let mut framer = LineFramer::new();
    let mut transcript = String::new();
    let mut warnings = Vec::new();
    let mut streaming = false;

    loop {
        let chunk = tokio::select! {
            biased;
            _ = cancel.changed() => {
                debug!(len = transcript.len(), "cancelled at chunk boundary");
                return SessionOutcome::cancelled(transcript, warnings);
            }
            chunk = body.next() => chunk,
        };

        match chunk {
            Some(Ok(bytes)) => {
                if !streaming && !bytes.is_empty() {
                    streaming = true;
                    let _ = state.send(SessionState::Streaming);
                    debug!("first body bytes received");
                }
                let text = match decoder.decode(&bytes) {
                    Ok(text) => text,
                    Err(err) => {
                        warn!("response body is not valid UTF-8");
                        return SessionOutcome::failed(transcript, warnings, err);
                    }
                };
                for line in framer.push(&text) {
                    if apply_line(&line, &mut transcript, &mut warnings, &mut on_delta) {
                        debug!(len = transcript.len(), "termination sentinel received");
                        return SessionOutcome::completed(transcript, warnings);
                    }
                }
            }
            Some(Err(err)) => {
                warn!(error = %err, "transport failure mid-stream");
                return SessionOutcome::failed(transcript, warnings, err);
            }
            None => {
                // Clean end of stream without the sentinel counts as
                // success; flush whatever the framer still holds.
                let discarded = decoder.finish();
                if discarded > 0 {
                    debug!(bytes = discarded, "discarded incomplete trailing character");
                }
                if let Some(line) = framer.finish() {
                    apply_line(&line, &mut transcript, &mut warnings, &mut on_delta);
                }
                debug!(len = transcript.len(), "stream ended");
                return SessionOutcome::completed(transcript, warnings);
            }
        }
    }
}

/// Apply one framed line; true means the termination sentinel arrived.
fn apply_line<F>(
    line: &str,
    transcript: &mut String,
    warnings: &mut Vec<DecodeWarning>,
    on_delta: &mut F,
) -> bool
where
    F: FnMut(&str),
{
    match event::extract(line) {
        Extraction::Delta(delta) => {
            trace!(len = delta.len(), "content delta");
            transcript.push_str(&delta);
            on_delta(&delta);
            false
        }
        Extraction::Done => true,
        Extraction::Ignore => false,
        Extraction::Malformed(warning) => {
            warn!(%warning, "skipping malformed event line");
            warnings.push(warning);
            false
        }
    }
}
