// HTTP client for the FocusFlow REST API
//
// `ApiClient` owns the reqwest client, base URLs, and the session store the
// bearer token is read from. Each backend domain contributes its endpoint
// methods from its own file.

pub mod auth;
pub mod calendar;
pub mod envelope;
pub mod error;
pub mod habits;
pub mod stats;
pub mod tasks;
pub mod voice;

pub use error::{ApiError, ApiResult};

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::config::Settings;
use crate::session::SessionStore;

pub struct ApiClient {
    http: Client,
    base_url: String,
    pipeline_url: String,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(settings: &Settings, session: SessionStore) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: trim_trailing_slash(&settings.api_url),
            pipeline_url: trim_trailing_slash(&settings.pipeline_url),
            session,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn pipeline(&self, path: &str) -> String {
        format!("{}{}", self.pipeline_url, path)
    }

    /// The stored bearer token, or `NotAuthenticated` if nobody is logged in.
    pub(crate) fn bearer(&self) -> ApiResult<String> {
        self.session.token().ok_or(ApiError::NotAuthenticated)
    }

    /// Execute a request and decode the `{success, data}` envelope.
    pub(crate) async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> ApiResult<T> {
        let response = req.send().await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(%status, body_len = body.len(), "API response");

        envelope::decode(status, &body).map_err(|e| {
            tracing::warn!(error = %e, "API request failed");
            e
        })
    }

    /// Execute a request where the payload is irrelevant (deletes, patches).
    pub(crate) async fn send_unit(&self, req: RequestBuilder) -> ApiResult<()> {
        let response = req.send().await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(%status, "API response");

        envelope::decode_unit(status, &body).map_err(|e| {
            tracing::warn!(error = %e, "API request failed");
            e
        })
    }

    /// Execute a request against the pipeline backend, whose responses are
    /// flat JSON (`{success, ...fields}`) rather than the main API's
    /// `{success, data}` envelope.
    pub(crate) async fn send_flat<T: DeserializeOwned>(&self, req: RequestBuilder) -> ApiResult<T> {
        let response = req.send().await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(%status, body_len = body.len(), "Pipeline response");

        if !status.is_success() {
            return Err(ApiError::from_status(
                status.as_u16(),
                None,
                body.chars().take(200).collect(),
            ));
        }

        serde_json::from_str(&body)
            .map_err(|e| ApiError::UnexpectedShape(format!("invalid pipeline response: {e}")))
    }

    /// Probe `GET /health`. Returns false on any failure; never errors.
    pub async fn check_connection(&self) -> bool {
        let url = self.url("/health");
        match self.http.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!(error = %e, "API health check failed");
                false
            }
        }
    }
}

fn trim_trailing_slash(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
