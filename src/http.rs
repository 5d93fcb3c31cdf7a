//! HTTP client construction.
//!
//! Applies the transport tuning carried on [`Configuration`]: timeout,
//! proxy, and extra headers. Auth and content-type headers are set at
//! the call site.

use reqwest::{Client, RequestBuilder};
use std::collections::HashMap;

use crate::config::Configuration;

/// Build a configured HTTP client from the transport fields of a
/// [`Configuration`].
pub fn build_http_client(config: &Configuration) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder();

    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(proxy_url) = &config.proxy {
        if let Ok(proxy) = reqwest::Proxy::all(proxy_url) {
            builder = builder.proxy(proxy);
        }
    }

    builder.build()
}

/// Add extra headers to a request if the configuration carries any.
pub fn add_extra_headers(
    mut request: RequestBuilder,
    extra_headers: &Option<HashMap<String, String>>,
) -> RequestBuilder {
    if let Some(headers) = extra_headers {
        for (key, value) in headers {
            request = request.header(key, value);
        }
    }
    request
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_build_http_client() {
        let config = Configuration::new("test").with_timeout(Duration::from_secs(30));
        let client = build_http_client(&config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_build_http_client_with_proxy() {
        let config = Configuration::new("test").with_proxy("http://proxy.example.com:8080");
        let client = build_http_client(&config);
        assert!(client.is_ok());
    }
}
