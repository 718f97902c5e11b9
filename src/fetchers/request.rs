use super::Fetcher;
use crate::error::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Builds the HTTP client shared by every acquisition strategy
pub fn build_client(timeout: Duration, user_agent: &str) -> Result<Client, FetchError> {
    Ok(Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()?)
}

/// GET the body of `url`, treating any non-2xx status as a failure
pub(crate) async fn get_text(client: &Client, url: &str) -> Result<String, FetchError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status { status });
    }
    Ok(response.text().await?)
}

/// Fetches the page directly
pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for RequestFetcher {
    fn name(&self) -> &str {
        "direct"
    }

    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        get_text(&self.client, url).await
    }
}
