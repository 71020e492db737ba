//! Outbound HTTP client for the backend service.
//!
//! One `BackendClient` is created at startup and shared by every tool call; it owns the single
//! pooled `reqwest::Client` of the process.

use crate::error::{AdapterError, Result};
use crate::registry::ToolRoute;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

#[derive(Debug)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
    timeout: Option<Duration>,
}

impl BackendClient {
    /// Build the client for `base_url`.
    ///
    /// `timeout` of `None` (or zero) means outbound calls are never cut short.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Config`] if `base_url` is not an absolute `http(s)` URL, and
    /// [`AdapterError::Startup`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let parsed = Url::parse(base_url).map_err(|e| {
            AdapterError::Config(format!("Invalid backend URL '{base_url}': {e}"))
        })?;
        let scheme = parsed.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(AdapterError::Config(format!(
                "Invalid backend URL '{base_url}': unsupported scheme '{scheme}'"
            )));
        }

        let client = Client::builder()
            .build()
            .map_err(|e| AdapterError::Startup(format!("build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: parsed,
            timeout: timeout.filter(|t| !t.is_zero()),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for `route` with `query` appended in order.
    ///
    /// Any path prefix on the base URL is kept (`http://host/api` + `/carts` →
    /// `http://host/api/carts`).
    ///
    /// # Errors
    ///
    /// Returns an error if the joined URL does not parse.
    pub fn url_for(&self, route: ToolRoute, query: &[(&str, String)]) -> Result<Url> {
        let joined = format!(
            "{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            route.path()
        );
        let mut url = Url::parse(&joined)
            .map_err(|e| AdapterError::Transport(format!("Invalid URL: {e}")))?;

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Issue one `GET` and return the response body verbatim on 2xx.
    ///
    /// # Errors
    ///
    /// - [`AdapterError::BackendHttp`] for a non-2xx status.
    /// - [`AdapterError::Transport`] when the backend cannot be reached or the body cannot be
    ///   read.
    pub async fn get(&self, route: ToolRoute, query: &[(&str, String)]) -> Result<String> {
        let url = self.url_for(route, query)?;

        let mut request = self.client.get(url);
        if let Some(t) = self.timeout {
            request = request.timeout(t);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(AdapterError::BackendHttp {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                body,
            })
        }
    }

    /// Release the client and its pooled connections.
    pub fn close(self) {
        debug!(backend = %strip_credentials(&self.base_url), "closing backend HTTP client");
        drop(self.client);
    }
}

/// Strip credentials from a URL before it ends up in a message.
#[must_use]
pub fn strip_credentials(url: &Url) -> String {
    let mut u = url.clone();
    let _ = u.set_username("");
    let _ = u.set_password(None);
    u.to_string()
}

fn transport_error(e: reqwest::Error) -> AdapterError {
    AdapterError::Transport(sanitize_reqwest_error(&e))
}

/// Render a reqwest error with its source chain (`connection refused` lives in the sources).
#[must_use]
pub fn sanitize_reqwest_error(e: &reqwest::Error) -> String {
    let mut msg = e.to_string();
    if let Some(u) = e.url() {
        msg = msg.replace(u.as_str(), &strip_credentials(u));
    }

    let mut source = std::error::Error::source(e);
    while let Some(cause) = source {
        let cause_msg = cause.to_string();
        if !msg.contains(&cause_msg) {
            msg.push_str(": ");
            msg.push_str(&cause_msg);
        }
        source = cause.source();
    }
    msg
}
