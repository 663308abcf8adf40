//! GraphDB repository over HTTP.
//!
//! Reads go to `{url}/repositories/{repo}` as `application/sparql-query`,
//! writes to `{url}/repositories/{repo}/statements` as
//! `application/sparql-update`. GraphDB applies a multi-operation update
//! request in one transaction, so `Update::Replace` is atomic here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::debug;

use super::sparql::{parse_results, render_query, render_update};
use super::{Query, SparqlStore, StoreCapabilities, StoreConfig, Update};
use crate::model::Binding;
use crate::{Error, Result};

const RESULTS_JSON: &str = "application/sparql-results+json";

/// Remote repository handle.
pub struct HttpStore {
    http: Client,
    url: String,
    repository: String,
}

impl HttpStore {
    pub fn new(url: impl Into<String>, repository: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: url.into().trim_end_matches('/').to_string(),
            repository: repository.into(),
        })
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        match config {
            StoreConfig::Http { url, repository, timeout_secs } => {
                Self::new(url.clone(), repository.clone(), Duration::from_secs(*timeout_secs))
            }
            StoreConfig::Memory => Err(Error::Config("HttpStore needs an http store config".into())),
        }
    }

    fn repository_url(&self) -> String {
        format!("{}/repositories/{}", self.url, self.repository)
    }

    /// Number of statements in the repository.
    pub async fn health(&self) -> Result<u64> {
        let url = format!("{}/rest/repositories/{}/size", self.url, self.repository);
        let response = self.http.get(&url).send().await.map_err(transport)?;
        let body = check(response).await?.text().await.map_err(transport)?;
        let size: serde_json::Value = serde_json::from_str(&body)?;
        // Plain number, or `{"total": n, "explicit": n, "inferred": n}`.
        size.as_u64()
            .or_else(|| size.get("total").and_then(serde_json::Value::as_u64))
            .ok_or_else(|| Error::Decode(format!("unexpected repository size payload: {body}")))
    }
}

fn transport(e: reqwest::Error) -> Error {
    Error::Transport(e.to_string())
}

async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(Error::NotFound(response.url().to_string()));
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::Transport(format!(
        "store returned {status}: {}",
        body.chars().take(200).collect::<String>()
    )))
}

#[async_trait]
impl SparqlStore for HttpStore {
    async fn select(&self, query: &Query) -> Result<Vec<Binding>> {
        let text = render_query(query)?;
        debug!(kind = query.kind(), "sparql select");
        let response = self
            .http
            .post(self.repository_url())
            .header("Content-Type", "application/sparql-query")
            .header("Accept", RESULTS_JSON)
            .body(text)
            .send()
            .await
            .map_err(transport)?;
        let body = check(response).await?.text().await.map_err(transport)?;
        parse_results(&body)
    }

    async fn update(&self, update: &Update) -> Result<()> {
        let text = render_update(update)?;
        debug!(kind = update.kind(), "sparql update");
        let response = self
            .http
            .post(format!("{}/statements", self.repository_url()))
            .header("Content-Type", "application/sparql-update")
            .body(text)
            .send()
            .await
            .map_err(transport)?;
        check(response).await?;
        Ok(())
    }

    fn capabilities(&self) -> StoreCapabilities {
        StoreCapabilities { atomic_update: true }
    }
}
