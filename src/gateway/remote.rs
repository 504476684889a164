use std::time::Duration;

use envelope_config::PLACEHOLDER_MARKER;
use envelope_core::{storage::SnapshotStore, StoreError};
use envelope_domain::{BucketSet, Snapshot, Transaction};
use reqwest::{
    blocking::{Client, Response},
    StatusCode, Url,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

/// HTTP client for the remote document store holding the wallet snapshot.
///
/// `GET <endpoint>` returns the stored document or `null`; `POST <endpoint>`
/// upserts it. A misconfigured endpoint does not prevent construction: every
/// call then fails with [`StoreError::Configuration`].
pub struct RemoteStore {
    endpoint: String,
    client: Result<(Client, Url), String>,
}

#[derive(Serialize)]
struct ResetRequest<'a> {
    action: &'static str,
    buckets: &'a BucketSet,
    transactions: &'a [Transaction],
}

impl RemoteStore {
    pub fn new(endpoint: &str, timeout: Duration) -> Self {
        let endpoint = endpoint.trim().to_string();
        let client = validate_endpoint(&endpoint).and_then(|url| {
            Client::builder()
                .timeout(timeout)
                .build()
                .map(|client| (client, url))
                .map_err(|err| format!("HTTP client unavailable: {err}"))
        });
        Self { endpoint, client }
    }

    fn ready(&self) -> Result<(&Client, &Url), StoreError> {
        match &self.client {
            Ok((client, url)) => Ok((client, url)),
            Err(problem) => Err(StoreError::Configuration(problem.clone())),
        }
    }

    fn get<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        let (client, url) = self.ready()?;
        let response = client.get(url.clone()).send().map_err(transport_error)?;
        let body = check_status(response)?.text().map_err(transport_error)?;
        let body = if body.trim().is_empty() {
            "null"
        } else {
            body.as_str()
        };
        serde_json::from_str(body).map_err(|err| StoreError::Serde(err.to_string()))
    }

    fn post<B: Serialize>(&self, body: &B) -> Result<(), StoreError> {
        let (client, url) = self.ready()?;
        let response = client
            .post(url.clone())
            .json(body)
            .send()
            .map_err(transport_error)?;
        check_status(response).map(|_| ())
    }
}

impl SnapshotStore for RemoteStore {
    fn describe(&self) -> String {
        format!("remote store {}", self.endpoint)
    }

    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        let snapshot: Option<Snapshot> = self.get()?;
        debug!(found = snapshot.is_some(), "remote snapshot fetched");
        Ok(snapshot)
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        self.post(snapshot)
    }

    fn save_reset(&self, buckets: &BucketSet) -> Result<(), StoreError> {
        self.post(&ResetRequest {
            action: "RESET",
            buckets,
            transactions: &[],
        })
    }
}

fn validate_endpoint(endpoint: &str) -> Result<Url, String> {
    if endpoint.is_empty() {
        return Err("remote endpoint is empty".into());
    }
    if endpoint.contains(PLACEHOLDER_MARKER) {
        return Err("remote credentials still contain the password placeholder".into());
    }
    let url =
        Url::parse(endpoint).map_err(|err| format!("malformed remote endpoint `{endpoint}`: {err}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported remote scheme `{other}`")),
    }
}

fn transport_error(err: reqwest::Error) -> StoreError {
    StoreError::Unreachable(err.to_string())
}

fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();

    if status.is_success() {
        Ok(response)
    } else if status == StatusCode::NOT_FOUND {
        Err(StoreError::Unreachable(
            "remote endpoint not found (404)".into(),
        ))
    } else {
        let message = response.text().unwrap_or_default();
        Err(StoreError::Rejected {
            status: status.as_u16(),
            message: extract_error(&message),
        })
    }
}

/// Pulls `error` out of a `{ "error": "..." }` body, else returns the body.
fn extract_error(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}
