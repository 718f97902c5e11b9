use super::{Extractor, ParsingContext};
use crate::classifier::classify;
use crate::ingredient::parse_ingredient_line;
use crate::model::{Ingredient, Recipe, UNTITLED_RECIPE};
use crate::text::normalize;
use log::debug;
use scraper::Selector;
use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;

static SCRIPT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("Invalid JSON-LD selector")
});

pub struct JsonLdExtractor;

impl JsonLdExtractor {
    fn convert_to_recipe(&self, json_ld_recipe: JsonLdRecipe) -> Recipe {
        let name = json_ld_recipe
            .name
            .map(|n| normalize(&n.into_text()))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNTITLED_RECIPE.to_string());
        let description = json_ld_recipe
            .description
            .map(|d| normalize(&d.into_text()))
            .unwrap_or_default();

        let ingredients = match json_ld_recipe.recipe_ingredient {
            Some(RecipeIngredients::Multiple(entries)) => entries
                .into_iter()
                .filter_map(IngredientEntry::into_line)
                .filter_map(|line| parse_line(&line))
                .collect(),
            Some(RecipeIngredients::Single(line)) => parse_line(&line).into_iter().collect(),
            Some(RecipeIngredients::Other(_)) | None => Vec::new(),
        };

        let meal_types = classify(&name, &description);

        Recipe {
            id: String::new(),
            name,
            description,
            ingredients,
            meal_types,
            servings: 0,
            url: String::new(),
        }
    }
}

/// Parse one raw ingredient line, skipping lines that clean up to nothing
fn parse_line(line: &str) -> Option<Ingredient> {
    let ingredient = parse_ingredient_line(line);
    if ingredient.name.is_empty() {
        None
    } else {
        Some(ingredient)
    }
}

#[derive(Debug, Deserialize)]
struct JsonLdRecipe {
    #[serde(default)]
    name: Option<TextType>,
    #[serde(default)]
    description: Option<TextType>,
    #[serde(rename = "recipeIngredient", default)]
    recipe_ingredient: Option<RecipeIngredients>,
}

#[derive(Debug, Deserialize)]
struct TextObject {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextType {
    String(String),
    Object(TextObject),
    Multiple(Vec<String>),
    Other(IgnoredAny),
}

impl TextType {
    fn into_text(self) -> String {
        match self {
            TextType::String(s) => s,
            TextType::Object(o) => o.text,
            TextType::Multiple(v) => v.into_iter().next().unwrap_or_default(),
            TextType::Other(_) => String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeIngredients {
    Multiple(Vec<IngredientEntry>),
    Single(String),
    Other(IgnoredAny),
}

#[derive(Debug, Deserialize)]
struct IngredientObject {
    name: String,
    amount: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IngredientEntry {
    String(String),
    Object(IngredientObject),
    Other(Value),
}

impl IngredientEntry {
    fn into_line(self) -> Option<String> {
        match self {
            IngredientEntry::String(s) => Some(s),
            IngredientEntry::Object(obj) => {
                let amount = obj.amount.as_deref().unwrap_or("").trim();
                if amount.is_empty() {
                    Some(obj.name)
                } else {
                    Some(format!("{amount} {}", obj.name))
                }
            }
            IngredientEntry::Other(other) => {
                debug!("JsonLdExtractor: Skipping ingredient entry {}", other);
                None
            }
        }
    }
}

fn is_recipe_type(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(s)) => s.eq_ignore_ascii_case("recipe"),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(|s| s.eq_ignore_ascii_case("recipe")),
        _ => false,
    }
}

/// The first Recipe-typed object in a parsed JSON-LD block
fn find_recipe(json_ld: &Value) -> Option<&Value> {
    let candidates: &[Value] = match json_ld {
        Value::Array(items) => items,
        single => std::slice::from_ref(single),
    };

    candidates.iter().find_map(|candidate| {
        if is_recipe_type(candidate) {
            return Some(candidate);
        }
        candidate
            .get("@graph")
            .and_then(Value::as_array)
            .and_then(|graph| graph.iter().find(|item| is_recipe_type(item)))
    })
}

impl Extractor for JsonLdExtractor {
    fn name(&self) -> &str {
        "json_ld"
    }

    fn extract(&self, context: &ParsingContext) -> Option<Recipe> {
        debug!("JsonLdExtractor: Starting parse for URL: {}", context.url);

        for (index, script) in context.document.select(&SCRIPT_SELECTOR).enumerate() {
            let raw_json = script.text().collect::<String>();

            let json_ld = match serde_json::from_str::<Value>(raw_json.trim()) {
                Ok(json_ld) => json_ld,
                Err(e) => {
                    debug!("JsonLdExtractor: Failed to parse JSON-LD {}: {}", index, e);
                    continue;
                }
            };

            let Some(recipe) = find_recipe(&json_ld) else {
                debug!("JsonLdExtractor: No recipe found in JSON-LD {}", index);
                continue;
            };

            match serde_json::from_value::<JsonLdRecipe>(recipe.clone()) {
                Ok(recipe) => return Some(self.convert_to_recipe(recipe)),
                Err(e) => {
                    debug!("JsonLdExtractor: Failed to convert to JsonLdRecipe: {}", e);
                }
            }
        }

        debug!("JsonLdExtractor: No valid recipe found in any JSON-LD script");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MealType, MealTypes};

    fn create_html_document(json_ld: &str) -> String {
        format!(
            r#"
            <!DOCTYPE html>
            <html>
            <head>
                <script type="application/ld+json">
                    {json_ld}
                </script>
            </head>
            <body></body>
            </html>
            "#
        )
    }

    fn extract(html: &str) -> Option<Recipe> {
        JsonLdExtractor.extract(&ParsingContext::new("http://example.com", html))
    }

    #[test]
    fn test_no_json_ld() {
        assert!(extract("<html><body>Test</body></html>").is_none());
    }

    #[test]
    fn test_soup() {
        let html = r#"<script type="application/ld+json">{"@type":"Recipe","name":"Soup","recipeIngredient":["1 cup water"]}</script>"#;
        let recipe = extract(html).unwrap();

        assert_eq!(recipe.name, "Soup");
        assert_eq!(recipe.description, "");
        assert_eq!(
            recipe.ingredients,
            vec![Ingredient {
                name: "water".to_string(),
                quantity: 1.0,
                unit: "cup".to_string(),
            }]
        );
        assert!(recipe.meal_types.contains(MealType::Lunch));
        assert_eq!(recipe.id, "");
        assert_eq!(recipe.servings, 0);
    }

    #[test]
    fn test_parse_basic_recipe() {
        let json_ld = r#"
        {
            "@context": "https://schema.org/",
            "@type": "Recipe",
            "name": "Chocolate Chip Cookies",
            "description": "Delicious homemade cookies &amp; milk",
            "recipeIngredient": ["2 cups flour", "1/2 tsp salt", "Chocolate chips to taste", "   "],
            "recipeInstructions": "Mix ingredients. Bake at 350F for 10 minutes."
        }
        "#;
        let recipe = extract(&create_html_document(json_ld)).unwrap();

        assert_eq!(recipe.name, "Chocolate Chip Cookies");
        assert_eq!(recipe.description, "Delicious homemade cookies & milk");
        assert_eq!(recipe.ingredients.len(), 3);
        assert_eq!(recipe.ingredients[0].unit, "cups");
        assert_eq!(recipe.ingredients[1].quantity, 0.5);
        assert_eq!(recipe.ingredients[2].name, "Chocolate chips to taste");
        assert_eq!(recipe.meal_types, MealTypes::only(MealType::Dinner));
    }

    #[test]
    fn test_missing_name_defaults() {
        let json_ld = r#"{"@type": "Recipe", "recipeIngredient": ["3 eggs"]}"#;
        let recipe = extract(&create_html_document(json_ld)).unwrap();

        assert_eq!(recipe.name, UNTITLED_RECIPE);
        assert_eq!(recipe.description, "");
        assert_eq!(recipe.ingredients[0].quantity, 3.0);
    }

    #[test]
    fn test_recipe_in_graph() {
        let json_ld = r#"
        {
            "@context": "https://schema.org",
            "@graph": [
                {"@type": "WebSite", "name": "Recipe Website"},
                {"@type": "Recipe", "name": "Beef Stew", "description": {"text": "Slow cooked"}},
                {"@type": "Recipe", "name": "Second Recipe"}
            ]
        }
        "#;
        let recipe = extract(&create_html_document(json_ld)).unwrap();

        assert_eq!(recipe.name, "Beef Stew");
        assert_eq!(recipe.description, "Slow cooked");
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.meal_types.contains(MealType::Dinner));
    }

    #[test]
    fn test_recipe_in_array() {
        let json_ld = r#"
        [
            {"@type": "WebSite", "name": "Recipe Website"},
            {"@type": ["Recipe", "NewsArticle"], "name": "Blueberry Muffins"}
        ]
        "#;
        let recipe = extract(&create_html_document(json_ld)).unwrap();
        assert_eq!(recipe.name, "Blueberry Muffins");
        assert!(recipe.meal_types.contains(MealType::Breakfast));
    }

    #[test]
    fn test_lowercase_type() {
        let json_ld = r#"{"@type": "recipe", "name": "Easy Black Bean Soup"}"#;
        let recipe = extract(&create_html_document(json_ld)).unwrap();
        assert_eq!(recipe.name, "Easy Black Bean Soup");
    }

    #[test]
    fn test_malformed_block_is_skipped() {
        let html = r#"
            <script type="application/ld+json">{ "@type": "Recipe", "name": </script>
            <script type="application/ld+json">{"@type": "Organization", "name": "Site"}</script>
            <script type="application/ld+json">{"@type": "Recipe", "name": "Waffles"}</script>
            <script type="application/ld+json">{"@type": "Recipe", "name": "Later"}</script>
        "#;
        let recipe = extract(html).unwrap();
        assert_eq!(recipe.name, "Waffles");
    }

    #[test]
    fn test_ingredient_objects_and_odd_entries() {
        let json_ld = r#"
        {
            "@type": "Recipe",
            "name": "Pasta",
            "recipeIngredient": [
                {"name": "spaghetti", "amount": "200 g"},
                {"name": "parmesan"},
                42,
                "2 tbsp olive oil"
            ]
        }
        "#;
        let recipe = extract(&create_html_document(json_ld)).unwrap();

        assert_eq!(recipe.ingredients.len(), 3);
        assert_eq!(recipe.ingredients[0].quantity, 200.0);
        assert_eq!(recipe.ingredients[0].unit, "g");
        assert_eq!(recipe.ingredients[0].name, "spaghetti");
        assert_eq!(recipe.ingredients[1].name, "parmesan");
        assert_eq!(recipe.ingredients[2].unit, "tbsp");
    }

    #[test]
    fn test_unexpected_field_shapes_are_ignored() {
        let json_ld = r#"
        {
            "@type": "Recipe",
            "name": {"@id": "https://example.com/#name"},
            "description": 42,
            "recipeIngredient": {"count": 3}
        }
        "#;
        let recipe = extract(&create_html_document(json_ld)).unwrap();

        assert_eq!(recipe.name, UNTITLED_RECIPE);
        assert_eq!(recipe.description, "");
        assert!(recipe.ingredients.is_empty());
    }

    #[test]
    fn test_ingredient_lines_are_cleaned_once_before_parsing() {
        let json_ld = r#"
        {
            "@type": "Recipe",
            "name": "Bread",
            "recipeIngredient": ["%2531 cup flour", "   ", "&nbsp;", "2 cups&nbsp;water"]
        }
        "#;
        let recipe = extract(&create_html_document(json_ld)).unwrap();

        assert_eq!(
            recipe.ingredients,
            vec![
                Ingredient::unitless("1 cup flour"),
                Ingredient {
                    name: "water".to_string(),
                    quantity: 2.0,
                    unit: "cups".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_html_in_fields_is_cleaned() {
        let json_ld = r#"
        {
            "@type": "Recipe",
            "name": "Jalape&ntilde;o Poppers",
            "description": "<p>Crispy   &amp; cheesy</p>",
            "recipeIngredient": ["12 jalape%C3%B1os"]
        }
        "#;
        let recipe = extract(&create_html_document(json_ld)).unwrap();

        assert_eq!(recipe.name, "Jalapeño Poppers");
        assert_eq!(recipe.description, "Crispy & cheesy");
        assert_eq!(recipe.ingredients[0].name, "jalapeños");
        assert_eq!(recipe.ingredients[0].quantity, 12.0);
    }
}
