use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response};
use tracing::debug;

use crate::models::{ActivitySet, ServerReply};

const CLIENT_UA: &str = concat!("activity-board/", env!("CARGO_PKG_VERSION"));

/// The three backend calls the board needs.
#[async_trait]
pub trait ActivitiesApi: Send + Sync {
    async fn list_activities(&self) -> Result<ActivitySet>;
    async fn signup(&self, activity: &str, email: &str) -> Result<ServerReply>;
    async fn unregister(&self, activity: &str, email: &str) -> Result<ServerReply>;
}

pub struct ActivitiesClient {
    client: Client,
    base_url: String,
}

impl ActivitiesClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .default_headers(default_headers())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `{base}/activities/{activity}/{tail}?email={email}` with both values percent-encoded.
    fn participant_url(&self, activity: &str, tail: &str, email: &str) -> String {
        format!(
            "{}/activities/{}/{}?email={}",
            self.base_url,
            urlencoding::encode(activity),
            tail,
            urlencoding::encode(email)
        )
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_UA));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// Turn a signup/unregister response into a `ServerReply`.
/// A body that is not JSON is an error whatever the status.
async fn read_reply(resp: Response, what: &str) -> Result<ServerReply> {
    let status = resp.status();
    let text = resp
        .text()
        .await
        .with_context(|| format!("Failed to read {what} response"))?;
    debug!("{} response (status {}): {}", what, status, text);

    let body: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {what} response (status {status}): {text}"))?;
    let field = |key: &str| body.get(key).and_then(|v| v.as_str()).map(str::to_string);

    if status.is_success() {
        Ok(ServerReply::Accepted {
            message: field("message").unwrap_or_default(),
        })
    } else {
        Ok(ServerReply::Rejected {
            status: status.as_u16(),
            detail: field("detail"),
        })
    }
}

#[async_trait]
impl ActivitiesApi for ActivitiesClient {
    async fn list_activities(&self) -> Result<ActivitySet> {
        let url = format!("{}/activities", self.base_url);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to fetch activities")?;

        let status = resp.status();
        if !status.is_success() {
            bail!("Activities request failed with status {status}");
        }

        let set: ActivitySet = resp
            .json()
            .await
            .context("Failed to parse activities response")?;
        debug!("Fetched {} activities", set.len());
        Ok(set)
    }

    async fn signup(&self, activity: &str, email: &str) -> Result<ServerReply> {
        let url = self.participant_url(activity, "signup", email);

        let resp = self
            .client
            .post(&url)
            .send()
            .await
            .context("Failed to send signup request")?;

        read_reply(resp, "Signup").await
    }

    async fn unregister(&self, activity: &str, email: &str) -> Result<ServerReply> {
        let url = self.participant_url(activity, "participants", email);

        let resp = self
            .client
            .delete(&url)
            .send()
            .await
            .context("Failed to send unregister request")?;

        read_reply(resp, "Unregister").await
    }
}
