use super::{Extractor, ParsingContext};
use crate::classifier::classify;
use crate::ingredient::parse_ingredient_line;
use crate::model::{Ingredient, Recipe};
use crate::text::normalize;
use log::debug;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static ITEMTYPE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[itemtype]").expect("Invalid itemtype selector"));

pub struct MicroDataExtractor;

impl MicroDataExtractor {
    fn find_recipe_container<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        document.select(&ITEMTYPE_SELECTOR).find(|element| {
            element
                .value()
                .attr("itemtype")
                .is_some_and(is_schema_org_recipe)
        })
    }

    /// Properties named `prop` that belong to `root` itself, in document order
    fn itemprops<'a>(&self, root: ElementRef<'a>, prop: &str) -> Vec<ElementRef<'a>> {
        let Ok(selector) = Selector::parse(&format!("[itemprop~='{prop}']")) else {
            return Vec::new();
        };
        root.select(&selector)
            .filter(|el| belongs_to(root, *el))
            .collect()
    }

    fn get_itemprop(&self, root: ElementRef, prop: &str) -> Option<String> {
        self.itemprops(root, prop)
            .into_iter()
            .next()
            .map(property_value)
            .filter(|value| !value.is_empty())
    }
}

fn is_schema_org_recipe(itemtype: &str) -> bool {
    let itemtype = itemtype.trim().trim_end_matches('/').to_ascii_lowercase();
    itemtype == "http://schema.org/recipe" || itemtype == "https://schema.org/recipe"
}

/// Inner text of a property element, or its `content` attribute when the
/// element has no text (e.g. `<meta itemprop="name" content="...">`).
fn property_value(element: ElementRef) -> String {
    let text = normalize(&element.text().collect::<Vec<_>>().join(" "));
    if !text.is_empty() {
        return text;
    }
    element
        .value()
        .attr("content")
        .map(normalize)
        .unwrap_or_default()
}

/// Whether `element`'s nearest enclosing item is `root` rather than some
/// nested `itemscope` (an author, a nutrition block, ...).
fn belongs_to(root: ElementRef, element: ElementRef) -> bool {
    for ancestor in element.ancestors() {
        if ancestor.id() == root.id() {
            return true;
        }
        if let Some(el) = ElementRef::wrap(ancestor) {
            if el.value().attr("itemscope").is_some() {
                return false;
            }
        }
    }
    false
}

impl Extractor for MicroDataExtractor {
    fn name(&self) -> &str {
        "microdata"
    }

    fn extract(&self, context: &ParsingContext) -> Option<Recipe> {
        debug!("Attempting to extract recipe using MicroData extractor");

        let Some(container) = self.find_recipe_container(&context.document) else {
            debug!("No MicroData Recipe container found");
            return None;
        };

        let Some(name) = self.get_itemprop(container, "name") else {
            debug!("Could not extract recipe name from MicroData");
            return None;
        };
        let description = self
            .get_itemprop(container, "description")
            .unwrap_or_default();

        let ingredients: Vec<Ingredient> = self
            .itemprops(container, "recipeIngredient")
            .into_iter()
            .map(|el| el.text().collect::<Vec<_>>().join(" "))
            .filter(|text| !text.trim().is_empty())
            .map(|text| parse_ingredient_line(&text))
            .collect();

        let meal_types = classify(&name, &description);

        Some(Recipe {
            id: String::new(),
            name,
            description,
            ingredients,
            meal_types,
            servings: 0,
            url: String::new(),
        })
    }
}
