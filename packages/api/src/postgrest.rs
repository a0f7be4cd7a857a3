//! REST client for the hosted employee table.
//!
//! Requests follow the PostgREST dialect: filters are query parameters
//! (`id=eq.7`, `id=in.(1,2,3)`), ordering is `order=created_at.desc`, and
//! `Prefer: return=representation` makes an insert echo the stored row.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use store::{
    ChangeFeed, DirectoryConfig, Employee, EmployeeDraft, EmployeeId, EmployeePatch,
    EmployeeStore, StoreConfig, StoreError,
};

/// EmployeeStore backed by the hosted database's REST endpoint.
#[derive(Clone, Debug)]
pub struct PostgrestStore {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    poll_interval: Duration,
}

impl PostgrestStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint_for(&config.url, &config.table),
            api_key: config.api_key.clone(),
            poll_interval: Duration::ZERO,
        }
    }

    /// Store plus a polling change feed at the configured interval.
    pub fn from_config(config: &DirectoryConfig) -> Self {
        Self::new(&config.store)
            .with_poll_interval(Duration::from_secs(config.sync.poll_interval_secs.into()))
    }

    /// Builder method to set the change-feed polling interval. Zero disables it.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.client
            .request(method, &self.endpoint)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

fn endpoint_for(url: &str, table: &str) -> String {
    format!("{}/rest/v1/{}", url.trim_end_matches('/'), table)
}

fn list_params() -> [(&'static str, String); 2] {
    [
        ("select", "*".to_string()),
        ("order", "created_at.desc".to_string()),
    ]
}

fn eq_param(id: &EmployeeId) -> (&'static str, String) {
    ("id", format!("eq.{}", filter_value(id.as_str())))
}

fn in_param(ids: &[EmployeeId]) -> (&'static str, String) {
    let values: Vec<String> = ids.iter().map(|id| filter_value(id.as_str())).collect();
    ("id", format!("in.({})", values.join(",")))
}

/// Quote a filter value when it contains PostgREST's reserved characters.
fn filter_value(value: &str) -> String {
    if value.contains([',', '.', ':', '(', ')', '"', ' ']) {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Map a non-success response body to a rejection, preferring the backend's
/// own error message.
fn rejection(status: u16, body: &str) -> StoreError {
    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) => err.message,
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => format!("HTTP {status}"),
    };
    StoreError::Rejected { status, message }
}

fn transport(e: reqwest::Error) -> StoreError {
    if e.is_builder() {
        StoreError::InvalidRequest(e.to_string())
    } else if e.is_decode() {
        StoreError::Malformed(e.to_string())
    } else {
        StoreError::Unreachable(e.to_string())
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, StoreError> {
    Ok(serde_json::from_str(body)?)
}

async fn check(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let err = rejection(status.as_u16(), &body);
    tracing::warn!("store request failed: {err}");
    Err(err)
}

impl EmployeeStore for PostgrestStore {
    async fn list(&self) -> Result<Vec<Employee>, StoreError> {
        tracing::debug!("GET {}", self.endpoint);
        let response = self
            .request(Method::GET)
            .query(&list_params())
            .send()
            .await
            .map_err(transport)?;
        let body = check(response).await?.text().await.map_err(transport)?;
        decode(&body)
    }

    async fn insert(&self, draft: &EmployeeDraft) -> Result<Employee, StoreError> {
        tracing::debug!("POST {}", self.endpoint);
        let response = self
            .request(Method::POST)
            .header("Prefer", "return=representation")
            .json(std::slice::from_ref(draft))
            .send()
            .await
            .map_err(transport)?;
        let body = check(response).await?.text().await.map_err(transport)?;
        let rows: Vec<Employee> = decode(&body)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Malformed("insert returned no rows".into()))
    }

    async fn update(&self, id: &EmployeeId, patch: &EmployeePatch) -> Result<(), StoreError> {
        tracing::debug!("PATCH {} id={id}", self.endpoint);
        let response = self
            .request(Method::PATCH)
            .query(&[eq_param(id)])
            .json(patch)
            .send()
            .await
            .map_err(transport)?;
        check(response).await?;
        Ok(())
    }

    async fn delete_many(&self, ids: &[EmployeeId]) -> Result<(), StoreError> {
        if ids.is_empty() {
            return Ok(());
        }
        tracing::debug!("DELETE {} ({} ids)", self.endpoint, ids.len());
        let response = self
            .request(Method::DELETE)
            .query(&[in_param(ids)])
            .send()
            .await
            .map_err(transport)?;
        check(response).await?;
        Ok(())
    }

    fn subscribe(&self) -> ChangeFeed {
        crate::poll::poll_feed(self.clone(), self.poll_interval)
    }
}
