use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub const UNTITLED_RECIPE: &str = "Untitled Recipe";
pub const UNKNOWN_INGREDIENT: &str = "Unknown Ingredient";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deduplicated set of meal types.
///
/// Serialized as a JSON array; order on the wire is breakfast, lunch, dinner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MealTypes(BTreeSet<MealType>);

impl MealTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn only(meal_type: MealType) -> Self {
        let mut set = Self::new();
        set.insert(meal_type);
        set
    }

    /// Returns `true` if the meal type was not already present
    pub fn insert(&mut self, meal_type: MealType) -> bool {
        self.0.insert(meal_type)
    }

    pub fn contains(&self, meal_type: MealType) -> bool {
        self.0.contains(&meal_type)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = MealType> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<MealType> for MealTypes {
    fn from_iter<I: IntoIterator<Item = MealType>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

impl Ingredient {
    /// An ingredient counted once with no unit, e.g. "Salt to taste"
    pub fn unitless(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: 1.0,
            unit: String::new(),
        }
    }

    fn validated(self) -> Self {
        let name = if self.name.trim().is_empty() {
            UNKNOWN_INGREDIENT.to_string()
        } else {
            self.name
        };
        let quantity = if self.quantity.is_finite() && self.quantity > 0.0 {
            self.quantity
        } else {
            1.0
        };
        Self {
            name,
            quantity,
            unit: self.unit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub meal_types: MealTypes,
    #[serde(default)]
    pub servings: u32,
    #[serde(default)]
    pub url: String,
}

impl Recipe {
    /// Coerce a recipe that came from outside the extraction pipeline into a
    /// shape that satisfies the model invariants.
    pub fn validated(self) -> Self {
        let name = if self.name.trim().is_empty() {
            UNTITLED_RECIPE.to_string()
        } else {
            self.name
        };
        let meal_types = if self.meal_types.is_empty() {
            MealTypes::only(MealType::Dinner)
        } else {
            self.meal_types
        };
        Self {
            id: self.id,
            name,
            description: self.description,
            ingredients: self
                .ingredients
                .into_iter()
                .map(Ingredient::validated)
                .collect(),
            meal_types,
            servings: self.servings,
            url: self.url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_types_serialize_as_array() {
        let mut types = MealTypes::new();
        types.insert(MealType::Dinner);
        types.insert(MealType::Breakfast);
        assert!(!types.insert(MealType::Dinner));

        let json = serde_json::to_string(&types).unwrap();
        assert_eq!(json, r#"["breakfast","dinner"]"#);
    }

    #[test]
    fn test_recipe_wire_format_uses_camel_case() {
        let recipe = Recipe {
            id: String::new(),
            name: "Soup".to_string(),
            description: String::new(),
            ingredients: vec![Ingredient::unitless("water")],
            meal_types: MealTypes::only(MealType::Lunch),
            servings: 0,
            url: "https://example.com/soup".to_string(),
        };

        let value = serde_json::to_value(&recipe).unwrap();
        assert_eq!(value["mealTypes"], serde_json::json!(["lunch"]));
        assert_eq!(value["ingredients"][0]["quantity"], serde_json::json!(1.0));
        assert_eq!(value["servings"], serde_json::json!(0));
    }

    #[test]
    fn test_validated_fills_defaults() {
        let recipe: Recipe = serde_json::from_str(
            r#"{
                "name": "  ",
                "ingredients": [{"name": "", "quantity": 0, "unit": "g"}],
                "mealTypes": []
            }"#,
        )
        .unwrap();

        let recipe = recipe.validated();
        assert_eq!(recipe.name, UNTITLED_RECIPE);
        assert_eq!(recipe.ingredients[0].name, UNKNOWN_INGREDIENT);
        assert_eq!(recipe.ingredients[0].quantity, 1.0);
        assert_eq!(recipe.ingredients[0].unit, "g");
        assert_eq!(recipe.meal_types, MealTypes::only(MealType::Dinner));
    }

    #[test]
    fn test_duplicate_meal_types_collapse() {
        let types: MealTypes = serde_json::from_str(r#"["lunch","lunch","breakfast"]"#).unwrap();
        assert_eq!(types.len(), 2);
        assert!(types.contains(MealType::Lunch));
    }
}
