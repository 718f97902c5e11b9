use super::request::get_text;
use super::Fetcher;
use crate::error::FetchError;
use async_trait::async_trait;
use reqwest::Client;

pub const URL_PLACEHOLDER: &str = "{url}";

/// Public cross-origin relays, tried in this order
pub const DEFAULT_RELAYS: &[&str] = &[
    "https://api.allorigins.win/raw?url={url}",
    "https://corsproxy.io/?{url}",
    "https://api.codetabs.com/v1/proxy?quest={url}",
];

/// Fetches the page through a relay endpoint that retrieves it on our behalf
pub struct RelayFetcher {
    template: String,
    client: Client,
}

impl RelayFetcher {
    pub fn new(template: impl Into<String>, client: Client) -> Result<Self, FetchError> {
        let template = template.into();
        if !template.contains(URL_PLACEHOLDER) {
            return Err(FetchError::InvalidTemplate(template));
        }
        Ok(Self { template, client })
    }

    pub fn relay_url(&self, target: &str) -> String {
        self.template
            .replace(URL_PLACEHOLDER, &urlencoding::encode(target))
    }
}

#[async_trait]
impl Fetcher for RelayFetcher {
    fn name(&self) -> &str {
        &self.template
    }

    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        get_text(&self.client, &self.relay_url(url)).await
    }
}
