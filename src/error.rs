use std::time::Duration;
use thiserror::Error;

/// Failure of a single acquisition strategy
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure (DNS, connect, TLS, body read, client timeout)
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("Failed to fetch URL: {status}")]
    Status { status: reqwest::StatusCode },

    /// A relay or callback template could not be turned into a request URL
    #[error("Invalid endpoint template '{0}'")]
    InvalidTemplate(String),

    /// The callback fallback did not fire before its deadline
    #[error("Callback '{callback}' did not fire within {timeout:?}")]
    CallbackTimeout { callback: String, timeout: Duration },

    /// The callback registration was dropped without ever firing
    #[error("Callback '{0}' was never invoked")]
    CallbackAbsent(String),

    /// The callback response did not have the expected `name(payload)` shape
    #[error("Malformed callback response: {0}")]
    MalformedCallback(String),

    /// The acquisition chain has no strategies to try
    #[error("No fetch strategies configured")]
    NoStrategies,
}

/// Every acquisition strategy failed
#[derive(Error, Debug)]
#[error("all fetch strategies failed ({attempts} tried), last error: {source}")]
pub struct AcquisitionError {
    pub attempts: usize,
    #[source]
    pub source: FetchError,
}

/// The page was fetched but carried no recognisable recipe data
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("No recipe data found on the provided URL")]
pub struct NoRecipeFoundError;

/// Errors surfaced by [`crate::RecipeScraper::scrape`]
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Failed to scrape recipe: URL is required")]
    MissingUrl,

    #[error("Failed to scrape recipe: {0}")]
    Acquisition(#[from] AcquisitionError),

    #[error("Failed to scrape recipe: {0}")]
    NoRecipeFound(#[from] NoRecipeFoundError),

    #[error("Failed to scrape recipe: {0}")]
    Config(#[from] config::ConfigError),

    /// The HTTP client backing the fetch strategies could not be built
    #[error("Failed to scrape recipe: {0}")]
    Client(#[source] FetchError),
}

impl ScrapeError {
    pub fn is_no_recipe_found(&self) -> bool {
        matches!(self, ScrapeError::NoRecipeFound(_))
    }
}
