//! Request configuration: endpoint, credential, model parameters, and
//! transport tuning.

use std::collections::HashMap;
use std::time::Duration;

use crate::error::Error;

/// Default chat-completions endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Default generation length cap.
pub const DEFAULT_MAX_TOKENS: u32 = 512;
/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// A secret string type for sensitive data like API keys.
/// Prevents accidental logging or display of secrets.
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
    /// Create a new secret string.
    pub fn new(s: String) -> Self {
        Self(s)
    }

    /// Get the underlying secret value.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// True when the secret holds no characters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretString([REDACTED])")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s.to_string())
    }
}

/// Everything one request needs to reach the completion endpoint.
///
/// A plain value object: the host loads it from wherever settings live,
/// runs [`validate`](Configuration::validate), and passes it to
/// [`start`](crate::session::start). The core holds no configuration
/// state of its own.
///
/// # Example
/// ```
/// use continuo::Configuration;
/// use std::time::Duration;
///
/// let config = Configuration::new("sk-...")
///     .with_model("gpt-4o-mini")
///     .with_max_tokens(256)
///     .with_temperature(0.4)
///     .with_timeout(Duration::from_secs(60));
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Configuration {
    /// Full URL the request is POSTed to.
    pub endpoint: String,

    /// Bearer credential for the `Authorization` header.
    pub credential: SecretString,

    /// Model identifier (e.g. "gpt-4o-mini").
    pub model: String,

    /// Maximum tokens to generate.
    pub max_tokens: u32,

    /// Sampling temperature; the valid range is provider-defined.
    pub temperature: f32,

    /// Overall request deadline, including the streamed body.
    /// A deadline expiring mid-stream surfaces as a transport failure.
    pub timeout: Option<Duration>,

    /// HTTP proxy URL.
    pub proxy: Option<String>,

    /// Additional HTTP headers to include in requests.
    pub extra_headers: Option<HashMap<String, String>>,
}

impl Configuration {
    /// Create a configuration with the given credential and defaults for
    /// everything else.
    pub fn new(credential: impl Into<SecretString>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            credential: credential.into(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout: None,
            proxy: None,
            extra_headers: None,
        }
    }

    /// Set the endpoint URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the proxy URL.
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Add a single extra header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Check the invariants a request depends on: non-empty endpoint and
    /// credential. Run by hosts after loading settings and again by the
    /// request builder before any network activity.
    pub fn validate(&self) -> Result<(), Error> {
        if self.endpoint.trim().is_empty() {
            return Err(Error::Config("endpoint must not be empty".to_string()));
        }
        if self.credential.is_empty() {
            return Err(Error::Config("credential must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_string_debug_is_redacted() {
        let secret = SecretString::from("sk-very-secret");
        assert_eq!(format!("{:?}", secret), "SecretString([REDACTED])");
    }

    #[test]
    fn test_defaults() {
        let config = Configuration::new("key");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_credential() {
        let config = Configuration::new("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_endpoint() {
        let config = Configuration::new("key").with_endpoint("   ");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builder_methods() {
        let config = Configuration::new("key")
            .with_endpoint("http://localhost:1234/v1/chat/completions")
            .with_model("local-model")
            .with_max_tokens(64)
            .with_temperature(0.0)
            .with_proxy("http://proxy.example.com:8080")
            .with_header("X-Title", "continuo");

        assert_eq!(config.model, "local-model");
        assert_eq!(config.max_tokens, 64);
        assert_eq!(config.proxy.as_deref(), Some("http://proxy.example.com:8080"));
        assert_eq!(
            config.extra_headers.unwrap().get("X-Title").map(String::as_str),
            Some("continuo")
        );
    }
}
