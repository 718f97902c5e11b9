use log::info;
use recipe_scraper::server::serve;
use recipe_scraper::{RecipeScraper, ScraperConfig};
use std::env;
use std::net::{IpAddr, SocketAddr};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = ScraperConfig::load()?;

    // PORT wins over the config file, matching common hosting setups
    let port = match env::var("PORT") {
        Ok(port) => port.parse()?,
        Err(_) => config.server.port,
    };
    let host: IpAddr = config.server.host.parse()?;

    let scraper = RecipeScraper::from_config(&config.acquisition)?;
    info!("Acquisition mode: {:?}", config.acquisition.mode);

    let handle = serve(SocketAddr::new(host, port), scraper)?;
    info!("Server running on port {}", handle.local_addr().port());
    handle.wait().await;
    Ok(())
}
