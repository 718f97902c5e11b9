//! Turn recipe web pages into structured [`Recipe`] records.
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let recipe = recipe_scraper::scrape_recipe("https://example.com/pancakes").await?;
//! println!("{} ({} ingredients)", recipe.name, recipe.ingredients.len());
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod config;
pub mod error;
pub mod extractors;
pub mod fetchers;
pub mod ingredient;
pub mod model;
pub mod pipeline;
pub mod server;
pub mod text;

pub use classifier::classify;
pub use config::{AcquisitionMode, ScraperConfig};
pub use error::{AcquisitionError, FetchError, NoRecipeFoundError, ScrapeError};
pub use fetchers::Acquisition;
pub use ingredient::parse_ingredient_line;
pub use model::{Ingredient, MealType, MealTypes, Recipe};
pub use pipeline::{scrape_recipe, RecipeScraper};
pub use text::normalize;
