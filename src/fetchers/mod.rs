pub mod jsonp;
pub mod relay;
pub mod request;

pub use jsonp::{CallbackRegistry, JsonpFetcher};
pub use relay::RelayFetcher;
pub use request::RequestFetcher;

use crate::config::{AcquisitionConfig, AcquisitionMode};
use crate::error::{AcquisitionError, FetchError};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::time::Duration;

/// One way of getting a page's HTML
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Short label used in logs
    fn name(&self) -> &str;

    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Ordered chain of fetch strategies. The first one to return HTML wins.
pub struct Acquisition {
    strategies: Vec<Box<dyn Fetcher>>,
}

impl Acquisition {
    pub fn new(strategies: Vec<Box<dyn Fetcher>>) -> Self {
        Self { strategies }
    }

    /// Build the chain described by `config`
    pub fn from_config(config: &AcquisitionConfig) -> Result<Self, FetchError> {
        let client = request::build_client(config.request_timeout(), &config.user_agent)?;

        let mut strategies: Vec<Box<dyn Fetcher>> =
            vec![Box::new(RequestFetcher::new(client.clone()))];

        if config.mode == AcquisitionMode::Relayed {
            for template in &config.relays {
                match RelayFetcher::new(template.as_str(), client.clone()) {
                    Ok(relay) => strategies.push(Box::new(relay)),
                    Err(e) => warn!("Skipping relay: {}", e),
                }
            }

            if config.jsonp.enabled {
                let jsonp = JsonpFetcher::new(
                    config.jsonp.endpoint.as_str(),
                    client,
                    Duration::from_secs(config.jsonp.timeout),
                )?;
                strategies.push(Box::new(jsonp));
            }
        }

        debug!(
            "Acquisition chain: {}",
            strategies
                .iter()
                .map(|s| s.name())
                .collect::<Vec<_>>()
                .join(" -> ")
        );

        Ok(Self { strategies })
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Try each strategy in turn until one yields the page
    pub async fn acquire_html(&self, url: &str) -> Result<String, AcquisitionError> {
        let mut last_error = None;

        for (attempt, strategy) in self.strategies.iter().enumerate() {
            debug!(
                "Fetching {} with '{}' (strategy {}/{})",
                url,
                strategy.name(),
                attempt + 1,
                self.strategies.len()
            );

            match strategy.fetch(url).await {
                Ok(html) => {
                    info!("Fetched {} using '{}'", url, strategy.name());
                    return Ok(html);
                }
                Err(e) => {
                    warn!("Strategy '{}' failed for {}: {}", strategy.name(), url, e);
                    last_error = Some(e);
                }
            }
        }

        Err(AcquisitionError {
            attempts: self.strategies.len(),
            source: last_error.unwrap_or(FetchError::NoStrategies),
        })
    }
}
