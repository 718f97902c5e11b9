use crate::model::Recipe;
use scraper::Html;

mod json_ld;
mod microdata;

pub use json_ld::JsonLdExtractor;
pub use microdata::MicroDataExtractor;

pub struct ParsingContext {
    pub url: String,
    pub document: Html,
}

impl ParsingContext {
    pub fn new(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            document: Html::parse_document(html),
        }
    }
}

/// A source of structured recipe data inside an HTML page.
///
/// `None` means "this page carries nothing I understand", which is an
/// ordinary outcome and lets the next extractor have a go.
pub trait Extractor {
    fn name(&self) -> &str;
    fn extract(&self, context: &ParsingContext) -> Option<Recipe>;
}

/// Extractors in the order they should be tried
pub fn default_extractors() -> Vec<Box<dyn Extractor + Send + Sync>> {
    vec![Box::new(JsonLdExtractor), Box::new(MicroDataExtractor)]
}
