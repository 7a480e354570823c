// NetXMS WebAPI HTTP client
//
// Wraps `reqwest::Client` with base-address joining, bearer-token auth and
// status classification. Endpoint helpers live in `endpoints.rs` as
// inherent methods so this module stays focused on transport mechanics.

use bytes::Bytes;
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::{Error, StatusKind};
use crate::transport::TransportConfig;

// ── Error response shape ─────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    reason: Option<String>,
}

/// Message used when a failed response carries no `reason`.
const GENERIC_ERROR_MESSAGE: &str = "request error";

// ── Raw response ─────────────────────────────────────────────────────

/// Status code and unparsed body of a completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Return the body on 2xx, otherwise classify the failure.
    ///
    /// A 401 is always [`Error::InvalidApiKey`]. Any other failure carries
    /// the server's `reason` when the body is a JSON object that has one.
    pub fn into_result(self) -> Result<Bytes, Error> {
        if self.is_success() {
            return Ok(self.body);
        }
        if self.status == 401 {
            return Err(Error::InvalidApiKey);
        }

        let message = serde_json::from_slice::<ErrorResponse>(&self.body)
            .ok()
            .and_then(|err| err.reason)
            .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_owned());

        Err(Error::Api {
            status: self.status,
            kind: StatusKind::from_status(self.status),
            message,
        })
    }
}

// ── URL joining ──────────────────────────────────────────────────────

/// Join a base address and a relative path with exactly one `/` between them.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the NetXMS WebAPI.
///
/// Every request carries `Authorization: Bearer <api key>` and is bounded by
/// the transport timeout. No retries are performed.
pub struct NetXmsClient {
    http: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

impl NetXmsClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a server address, API key, and transport config.
    ///
    /// Injects the bearer `Authorization` header as a default header,
    /// marked sensitive so it never shows up in debug output.
    pub fn from_api_key(
        base_url: &str,
        api_key: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut auth_value =
            HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
                .map_err(|e| Error::InvalidHeader(e.to_string()))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        let http = transport.build_client_with_headers(headers)?;
        Ok(Self {
            http,
            base_url: base_url.to_owned(),
            timeout_secs: transport.timeout.as_secs(),
        })
    }

    /// Absolute URL for a relative API path.
    pub fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(Url::parse(&join_url(&self.base_url, path))?)
    }

    // ── Request execution ────────────────────────────────────────────

    /// Perform a single request and return the raw status and body.
    ///
    /// Only transport failures are errors here; HTTP error statuses are
    /// returned as-is for the caller to classify.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<RawResponse, Error> {
        let mut request = self.request(method, path)?;
        if let Some(body) = body {
            request = request.json(body);
        }
        self.dispatch(request).await
    }

    /// `GET` a path and return the body of a successful response.
    pub async fn get(&self, path: &str) -> Result<Bytes, Error> {
        let request = self.request(Method::GET, path)?;
        self.dispatch(request).await?.into_result()
    }

    /// `POST` a JSON body and return the body of a successful response.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Bytes, Error> {
        let request = self.request(Method::POST, path)?.json(body);
        self.dispatch(request).await?.into_result()
    }

    fn request(&self, method: Method, path: &str) -> Result<reqwest::RequestBuilder, Error> {
        let url = self.url(path)?;
        debug!("{method} {url}");
        Ok(self.http.request(method, url))
    }

    async fn dispatch(&self, request: reqwest::RequestBuilder) -> Result<RawResponse, Error> {
        let resp = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(|e| self.transport_error(e))?;
        debug!(status, bytes = body.len(), "response received");
        Ok(RawResponse { status, body })
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(err)
        }
    }
}
