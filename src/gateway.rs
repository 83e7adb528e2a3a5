pub mod http_session_driven_ports;
pub mod http_task_driven_ports;

#[cfg(test)]
pub(crate) mod test_util;

use crate::domain::DrivenPortError;
use crate::external_connections;
use anyhow::Context;
use chrono::{DateTime, Datelike, Utc};
use reqwest::StatusCode;
use reqwest_middleware::ClientBuilder;
use reqwest_tracing::TracingMiddleware;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Data structure which owns the client for talking to the task backend.
/// Allows business logic to be agnostic of the transport so gateways can easily be
/// pointed somewhere else.
#[derive(Clone)]
pub struct ExternalConnectivity {
    api_base: String,
    http_client: reqwest_middleware::ClientWithMiddleware,
}

impl ExternalConnectivity {
    /// Builds a client for the backend at [api_base]. The client keeps a cookie jar so the
    /// session cookie set at login rides along on every later request.
    pub fn new(api_base: &str) -> Result<Self, anyhow::Error> {
        let base_client = reqwest::Client::builder()
            .use_rustls_tls()
            .cookie_store(true)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .context("building the backend http client")?;
        let http_client = ClientBuilder::new(base_client)
            .with(TracingMiddleware::default())
            .build();

        Ok(ExternalConnectivity {
            api_base: api_base.to_owned(),
            http_client,
        })
    }
}

impl external_connections::ExternalConnectivity for ExternalConnectivity {
    fn http_client(&self) -> &reqwest_middleware::ClientWithMiddleware {
        &self.http_client
    }

    fn api_base(&self) -> &str {
        &self.api_base
    }
}

/// Error payload the backend sends alongside non-success statuses
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Wraps a transport or decoding failure with what was being attempted
fn comms_failure(
    err: impl std::error::Error + Send + Sync + 'static,
    doing: &'static str,
) -> DrivenPortError {
    DrivenPortError::CommsFailure(anyhow::Error::new(err).context(doing))
}

/// Passes successful responses through and converts everything else into a [DrivenPortError]
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, DrivenPortError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let raw_body = response.text().await.unwrap_or_default();
    debug!(%status, body = %raw_body, "backend rejected request");
    let message = serde_json::from_str::<ErrorBody>(&raw_body)
        .ok()
        .and_then(|body| body.error.or(body.message))
        .unwrap_or(raw_body);

    Err(match status {
        StatusCode::UNAUTHORIZED => DrivenPortError::Unauthorized,
        StatusCode::NOT_FOUND => DrivenPortError::DoesNotExist,
        _ => DrivenPortError::Rejected {
            status: status.as_u16(),
            message,
        },
    })
}

/// Reads a successful response body as JSON
async fn decode<T: DeserializeOwned>(
    response: reqwest::Response,
    doing: &'static str,
) -> Result<T, DrivenPortError> {
    let response = check_status(response).await?;
    response
        .json::<T>()
        .await
        .map_err(|err| comms_failure(err, doing))
}

/// Parses a backend timestamp. The backend reports unset times as the zero time
/// (`0001-01-01T00:00:00Z`), which is treated the same as a missing value.
fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(raw?).ok()?.with_timezone(&Utc);
    (parsed.year() > 1).then_some(parsed)
}
