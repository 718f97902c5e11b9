use log::error;
use recipe_scraper::{RecipeScraper, ScraperConfig};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Get the URL from command-line arguments
    let args: Vec<String> = env::args().collect();
    let url = args.get(1).ok_or("Usage: recipe-scraper <URL>")?;

    let config = ScraperConfig::load()?;
    let scraper = RecipeScraper::from_config(&config.acquisition)?;

    match scraper.scrape(url).await {
        Ok(recipe) => {
            println!("{}", serde_json::to_string_pretty(&recipe)?);
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            Err(e.into())
        }
    }
}
