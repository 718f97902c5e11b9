use crate::model::{MealType, MealTypes};

const BREAKFAST_KEYWORDS: &[&str] = &[
    "breakfast", "pancake", "waffle", "oatmeal", "cereal", "muffin", "toast", "bagel", "egg",
    "omelet", "bacon", "sausage", "brunch", "morning",
];

const LUNCH_KEYWORDS: &[&str] = &[
    "lunch", "sandwich", "wrap", "salad", "soup", "quick", "easy", "light", "midday", "noon",
];

const DINNER_KEYWORDS: &[&str] = &[
    "dinner", "supper", "roast", "steak", "chicken", "beef", "pork", "fish", "pasta",
    "casserole", "hearty", "evening", "main course", "entrée", "entree",
];

const KEYWORDS: [(MealType, &[&str]); 3] = [
    (MealType::Breakfast, BREAKFAST_KEYWORDS),
    (MealType::Lunch, LUNCH_KEYWORDS),
    (MealType::Dinner, DINNER_KEYWORDS),
];

/// Guess the meal types a recipe suits from keywords in its name and
/// description. Falls back to dinner alone when nothing matches.
pub fn classify(name: &str, description: &str) -> MealTypes {
    let text = format!("{name} {description}").to_lowercase();

    let meal_types: MealTypes = KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|keyword| text.contains(keyword)))
        .map(|(meal_type, _)| *meal_type)
        .collect();

    if meal_types.is_empty() {
        MealTypes::only(MealType::Dinner)
    } else {
        meal_types
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakfast() {
        let types = classify("Pancakes", "Fluffy breakfast pancakes");
        assert!(types.contains(MealType::Breakfast));
    }

    #[test]
    fn test_dinner() {
        let types = classify("Grilled Steak", "Hearty dinner main course");
        assert!(types.contains(MealType::Dinner));
    }

    #[test]
    fn test_no_match_defaults_to_dinner_only() {
        assert_eq!(classify("Foo", "Bar"), MealTypes::only(MealType::Dinner));
        assert_eq!(classify("", ""), MealTypes::only(MealType::Dinner));
    }

    #[test]
    fn test_partial_match_is_not_merged_with_default() {
        assert_eq!(
            classify("Tomato Soup", ""),
            MealTypes::only(MealType::Lunch)
        );
    }

    #[test]
    fn test_multiple_types() {
        let types = classify("Bacon and egg sandwich", "A quick brunch");
        assert!(types.contains(MealType::Breakfast));
        assert!(types.contains(MealType::Lunch));
        assert!(!types.contains(MealType::Dinner));
    }

    #[test]
    fn test_case_insensitive_and_accented_keyword() {
        assert!(classify("ENTRÉE of the day", "").contains(MealType::Dinner));
        assert!(classify("SALAD", "").contains(MealType::Lunch));
    }

    #[test]
    fn test_pure() {
        let first = classify("Chicken Caesar Wrap", "Light and easy");
        let second = classify("Chicken Caesar Wrap", "Light and easy");
        assert_eq!(first, second);
    }
}
