use crate::model::Ingredient;
use crate::text::normalize;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

/// Unit tokens recognised after a leading quantity
pub const UNITS: &[&str] = &[
    "cup", "cups", "tbsp", "tsp", "tablespoon", "tablespoons", "teaspoon", "teaspoons",
    "oz", "ounce", "ounces", "lb", "pound", "pounds", "g", "gram", "grams", "kg",
    "ml", "milliliter", "milliliters", "l", "liter", "liters", "pinch", "pinches",
    "dash", "dashes", "clove", "cloves", "piece", "pieces", "slice", "slices",
    "can", "cans", "package", "packages",
];

static QUANTITY_UNIT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"(?i)^(\d+(?:[./]\d+)?)\s*({})?\s+(.+)$", UNITS.join("|"));
    Regex::new(&pattern).expect("Invalid ingredient regex")
});

/// Split a free-text ingredient line into quantity, unit and name.
///
/// The grammar runs on the normalized line; the name it yields is
/// normalized once more. Lines without a usable leading quantity become a
/// unitless ingredient of quantity 1 named after the whole line.
pub fn parse_ingredient_line(line: &str) -> Ingredient {
    let line = normalize(line);

    let Some(caps) = QUANTITY_UNIT_REGEX.captures(&line) else {
        return whole_line(&line);
    };

    let quantity = match parse_quantity(&caps[1]) {
        Some(q) => q,
        None => {
            debug!("Unusable quantity '{}' in ingredient '{}'", &caps[1], line);
            return whole_line(&line);
        }
    };

    let name = normalize(&caps[3]);
    if name.is_empty() {
        return whole_line(&line);
    }

    Ingredient {
        name,
        quantity,
        unit: caps
            .get(2)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default(),
    }
}

fn whole_line(line: &str) -> Ingredient {
    Ingredient::unitless(normalize(line))
}

/// Parses "3", "3.5" or "1/2"; rejects non-finite and non-positive values
fn parse_quantity(raw: &str) -> Option<f64> {
    let value = match raw.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator: f64 = numerator.parse().ok()?;
            let denominator: f64 = denominator.parse().ok()?;
            numerator / denominator
        }
        None => raw.parse().ok()?,
    };

    (value.is_finite() && value > 0.0).then_some(value)
}
