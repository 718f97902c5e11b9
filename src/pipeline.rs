use crate::config::{AcquisitionConfig, ScraperConfig};
use crate::error::{NoRecipeFoundError, ScrapeError};
use crate::extractors::{default_extractors, Extractor, ParsingContext};
use crate::fetchers::Acquisition;
use crate::model::Recipe;
use log::{debug, info};

/// Fetches a page and turns its structured data into a [`Recipe`].
///
/// This pipeline:
/// 1. Acquires the HTML through the configured fetch strategies
/// 2. Tries the JSON-LD extractor, then the microdata extractor
/// 3. Returns the first recipe found, stamped with the source URL
pub struct RecipeScraper {
    acquisition: Acquisition,
    extractors: Vec<Box<dyn Extractor + Send + Sync>>,
}

impl RecipeScraper {
    pub fn new(acquisition: Acquisition) -> Self {
        Self {
            acquisition,
            extractors: default_extractors(),
        }
    }

    pub fn from_config(config: &AcquisitionConfig) -> Result<Self, ScrapeError> {
        let acquisition = Acquisition::from_config(config).map_err(ScrapeError::Client)?;
        Ok(Self::new(acquisition))
    }

    pub async fn scrape(&self, url: &str) -> Result<Recipe, ScrapeError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ScrapeError::MissingUrl);
        }

        let html = self.acquisition.acquire_html(url).await?;
        let recipe = self.extract(&html, url)?;
        info!("Scraped '{}' from {}", recipe.name, url);
        Ok(recipe)
    }

    /// Run the extractors over already-fetched HTML
    pub fn extract(&self, html: &str, url: &str) -> Result<Recipe, NoRecipeFoundError> {
        let context = ParsingContext::new(url, html);

        for extractor in &self.extractors {
            if let Some(recipe) = extractor.extract(&context) {
                debug!("Extractor '{}' found a recipe", extractor.name());
                return Ok(Recipe {
                    url: context.url.clone(),
                    servings: 0,
                    ..recipe
                });
            }
            debug!("Extractor '{}' found nothing", extractor.name());
        }

        Err(NoRecipeFoundError)
    }
}

/// Scrape `url` once using the configuration from the environment and
/// `recipe-scraper.toml`.
pub async fn scrape_recipe(url: &str) -> Result<Recipe, ScrapeError> {
    let config = ScraperConfig::load()?;
    RecipeScraper::from_config(&config.acquisition)?
        .scrape(url)
        .await
}
