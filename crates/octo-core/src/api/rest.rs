//! HTTP implementation of [`ApiTransport`].

use std::time::Duration;

use reqwest::{Client, Response, StatusCode, header};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

use super::{ApiError, ApiTransport};
use crate::config::ServerConfig;

const API_KEY_HEADER: &str = "X-Octopus-ApiKey";

/// REST client for the deployment server.
///
/// The promotion engine is synchronous; each request is driven to completion
/// on a runtime owned by the client.
pub struct RestClient {
    client: Client,
    base_url: String,
    runtime: tokio::runtime::Runtime,
}

impl RestClient {
    pub fn new(config: &ServerConfig) -> Result<Self, ApiError> {
        let mut headers = header::HeaderMap::new();
        let api_key = header::HeaderValue::from_str(&config.api_key)
            .map_err(|e| ApiError::Transport(format!("Invalid API key header: {e}")))?;
        headers.insert(API_KEY_HEADER, api_key);

        let client = Client::builder()
            .user_agent(concat!("octo/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to build HTTP client: {e}")))?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to create tokio runtime: {e}")))?;

        Ok(Self {
            client,
            base_url: config.server_url.trim_end_matches('/').to_string(),
            runtime,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        endpoint_url(&self.base_url, path)
    }

    async fn read_response(response: Response, method: &str, url: &str) -> Result<Value, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status == StatusCode::NOT_FOUND {
                debug!("HTTP {} {} returned 404", method, url);
            } else {
                error!("HTTP {} {} failed: {} - {}", method, url, status, body);
            }
            return Err(classify_failure(status, &body, url));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ApiError::Decode(format!("{url}: {e}")))
    }
}

impl ApiTransport for RestClient {
    fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value, ApiError> {
        let url = self.endpoint(path);
        debug!("GET {} {:?}", url, query);

        self.runtime.block_on(async {
            let response = self
                .client
                .get(&url)
                .query(query)
                .send()
                .await
                .map_err(|e| transport_error(&url, e))?;
            Self::read_response(response, "GET", &url).await
        })
    }

    fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let url = self.endpoint(path);
        debug!("POST {}", url);

        self.runtime.block_on(async {
            let response = self
                .client
                .post(&url)
                .json(body)
                .send()
                .await
                .map_err(|e| transport_error(&url, e))?;
            Self::read_response(response, "POST", &url).await
        })
    }
}

fn endpoint_url(base_url: &str, path: &str) -> String {
    let path = path.trim_start_matches('/');
    format!("{}/api/{}", base_url.trim_end_matches('/'), path)
}

fn transport_error(url: &str, err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Transport(format!("Request to {url} timed out"))
    } else {
        ApiError::Transport(format!("Request to {url} failed: {err}"))
    }
}

/// Error body returned by the server on rejected requests.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ServerErrorBody {
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    errors: Vec<String>,
}

fn server_message(body: &str) -> String {
    let parsed: ServerErrorBody = serde_json::from_str(body).unwrap_or_default();
    match parsed.error_message {
        Some(message) if parsed.errors.is_empty() => message,
        Some(message) => format!("{} ({})", message, parsed.errors.join("; ")),
        None if body.trim().is_empty() => "no details provided".to_string(),
        None => body.trim().to_string(),
    }
}

fn classify_failure(status: StatusCode, body: &str, url: &str) -> ApiError {
    if status == StatusCode::NOT_FOUND {
        ApiError::NotFound(url.to_string())
    } else if status.is_client_error() {
        ApiError::Rejected {
            status: status.as_u16(),
            message: server_message(body),
        }
    } else {
        ApiError::Transport(format!("HTTP {} from {}", status, url))
    }
}
