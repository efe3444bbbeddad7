use crate::entities::{RawEngagement, RawNamed, RawTest, RawUser, ResultsPage};
use crate::error::{Result, TrackerError};
use crate::metrics_defs::UPSTREAM_REQUEST_FAILED;
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Client for the remote tracking API.
///
/// Holds the process-wide upstream configuration (base URL, token, timeout,
/// fetch limit) as an immutable value. Cloning is cheap; the inner reqwest
/// client shares its connection pool.
#[derive(Clone)]
pub struct Tracker {
    client: reqwest::Client,
    base: String,
    token: String,
    timeout: Duration,
    fetch_limit: u32,
}

impl Tracker {
    pub fn new(base_url: &Url, token: &str, timeout: Duration, fetch_limit: u32) -> Self {
        Tracker {
            client: reqwest::Client::new(),
            base: base_url.as_str().trim_end_matches('/').to_string(),
            token: token.to_string(),
            timeout,
            fetch_limit,
        }
    }

    /// Fetch one full collection page. The limit is taken from configuration
    /// and is expected to be effectively unbounded for real data volumes; no
    /// follow-on pagination is performed.
    async fn get_collection<T: DeserializeOwned>(
        &self,
        path: &str,
        extra_query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let url = format!("{}{path}", self.base);

        let request = self
            .client
            .get(&url)
            .header(AUTHORIZATION, format!("Token {}", self.token))
            .query(&[("limit", self.fetch_limit.to_string())])
            .query(extra_query)
            .timeout(self.timeout);

        let response = request.send().await.inspect_err(|_| {
            metrics::counter!(UPSTREAM_REQUEST_FAILED.name).increment(1);
        })?;

        let status = response.status();
        if !status.is_success() {
            metrics::counter!(UPSTREAM_REQUEST_FAILED.name).increment(1);
            return Err(TrackerError::Status { status, url });
        }

        let page = response.json::<ResultsPage<T>>().await?;
        Ok(page.into_records())
    }

    /// Send a partial-field update. Non-success statuses are errors; the
    /// payload is forwarded as-is.
    async fn put_entity(&self, path: &str, payload: &serde_json::Value) -> Result<()> {
        let url = format!("{}{path}", self.base);

        let response = self
            .client
            .put(&url)
            .header(AUTHORIZATION, format!("Token {}", self.token))
            .json(payload)
            .timeout(self.timeout)
            .send()
            .await
            .inspect_err(|_| {
                metrics::counter!(UPSTREAM_REQUEST_FAILED.name).increment(1);
            })?;

        let status = response.status();
        if !status.is_success() {
            metrics::counter!(UPSTREAM_REQUEST_FAILED.name).increment(1);
            return Err(TrackerError::Status { status, url });
        }

        Ok(())
    }

    pub async fn engagements(&self) -> Result<Vec<RawEngagement>> {
        self.get_collection("/api/v2/engagements/", &[]).await
    }

    pub async fn tests(&self) -> Result<Vec<RawTest>> {
        self.get_collection("/api/v2/tests/", &[]).await
    }

    pub async fn tests_for_engagement(&self, engagement_id: i64) -> Result<Vec<RawTest>> {
        self.get_collection(
            "/api/v2/tests/",
            &[("engagement", engagement_id.to_string())],
        )
        .await
    }

    pub async fn users(&self) -> Result<Vec<RawUser>> {
        self.get_collection("/api/v2/users/", &[]).await
    }

    pub async fn products(&self) -> Result<Vec<RawNamed>> {
        self.get_collection("/api/v2/products/", &[]).await
    }

    pub async fn environments(&self) -> Result<Vec<RawNamed>> {
        self.get_collection("/api/v2/development_environments/", &[])
            .await
    }

    pub async fn update_engagement(
        &self,
        engagement_id: i64,
        payload: &serde_json::Value,
    ) -> Result<()> {
        self.put_entity(&format!("/api/v2/engagements/{engagement_id}/"), payload)
            .await
    }

    pub async fn update_test(&self, test_id: i64, payload: &serde_json::Value) -> Result<()> {
        self.put_entity(&format!("/api/v2/tests/{test_id}/"), payload)
            .await
    }
}
