//! Fetch-and-decode wrapper used by every outbound request.
//!
//! This is the only module that talks to the network. Requests are made
//! once, with no retry and no timeout beyond the transport default. Every
//! failure is logged and collapsed to `None`.

use reqwest::{Client, Method, Url};

use crate::error::GeoError;

/// Query parameters whose values never appear in logs or errors.
const SECRET_PARAMS: [&str; 4] = ["apiKey", "api_key", "key", "token"];
const REDACTED: &str = "[redacted]";

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Option<Url>,
}

impl HttpClient {
    /// Creates a client that only accepts absolute URLs.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(user_agent: &str) -> Result<Self, GeoError> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            client,
            base_url: None,
        })
    }

    /// Creates a client that resolves relative paths (`/api/places`)
    /// against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`GeoError::InvalidUrl`] if `base_url` does not parse.
    pub fn with_base_url(user_agent: &str, base_url: &str) -> Result<Self, GeoError> {
        let mut http = Self::new(user_agent)?;
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| GeoError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        http.base_url = Some(parsed);
        Ok(http)
    }

    /// Performs one request and decodes the body as JSON.
    ///
    /// - An empty `url` returns an empty JSON array without touching the network.
    /// - An empty `method` means `GET`.
    /// - Non-2xx statuses, transport errors and undecodable bodies are logged
    ///   and return `None`.
    pub async fn fetch_json(&self, url: &str, method: &str) -> Option<serde_json::Value> {
        if url.is_empty() {
            return Some(serde_json::Value::Array(Vec::new()));
        }

        match self.try_fetch(url, method).await {
            Ok(body) => Some(body),
            Err(e) => {
                let url = redact_url_str(url);
                tracing::error!(url = %url, method, error = %e, "request failed");
                None
            }
        }
    }

    async fn try_fetch(&self, url: &str, method: &str) -> Result<serde_json::Value, GeoError> {
        let method = parse_method(method)?;
        let url = self.resolve_url(url)?;

        let response = self
            .client
            .request(method, url.clone())
            .send()
            .await
            .map_err(|e| GeoError::Http(e.without_url()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeoError::UnexpectedStatus {
                status: status.as_u16(),
                url: redact_url(&url),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| GeoError::Http(e.without_url()))?;
        serde_json::from_str(&body).map_err(|e| GeoError::Deserialize {
            context: redact_url(&url),
            source: e,
        })
    }

    fn resolve_url(&self, url: &str) -> Result<Url, GeoError> {
        if url.starts_with("http") {
            return Url::parse(url).map_err(|e| GeoError::InvalidUrl {
                url: url.to_owned(),
                reason: e.to_string(),
            });
        }

        let Some(base) = &self.base_url else {
            return Err(GeoError::InvalidUrl {
                url: url.to_owned(),
                reason: "relative URL with no base URL configured".to_owned(),
            });
        };

        base.join(url.trim_start_matches('/'))
            .map_err(|e| GeoError::InvalidUrl {
                url: url.to_owned(),
                reason: e.to_string(),
            })
    }
}

/// `url` with the values of secret query parameters replaced.
pub(crate) fn redact_url(url: &Url) -> String {
    if !url
        .query_pairs()
        .any(|(k, _)| SECRET_PARAMS.contains(&k.as_ref()))
    {
        return url.to_string();
    }
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if SECRET_PARAMS.contains(&k.as_ref()) {
                REDACTED.to_owned()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

/// Like [`redact_url`] for raw input; an unparseable URL loses its query.
fn redact_url_str(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => redact_url(&parsed),
        Err(_) => url.split('?').next().unwrap_or(url).to_owned(),
    }
}

fn parse_method(method: &str) -> Result<Method, GeoError> {
    let method = method.trim();
    if method.is_empty() {
        return Ok(Method::GET);
    }
    Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .map_err(|_| GeoError::InvalidMethod(method.to_owned()))
}
