use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::model::{Ingredient, Recipe, RecipeDetails};

/// The catalog numbers ingredient slots from 1 to 20
const INGREDIENT_SLOTS: usize = 20;

/// Response envelope shared by search and lookup endpoints.
///
/// The catalog answers `{"meals": null}` when nothing matched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealsEnvelope {
    #[serde(default)]
    pub meals: Option<Vec<MealRecord>>,
}

impl MealsEnvelope {
    pub fn new(meals: Vec<MealRecord>) -> Self {
        Self { meals: Some(meals) }
    }
}

/// One meal as sent by the catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealRecord {
    pub id_meal: String,
    #[serde(default)]
    pub str_meal: Option<String>,
    #[serde(default)]
    pub str_area: Option<String>,
    #[serde(default)]
    pub str_category: Option<String>,
    #[serde(default)]
    pub str_meal_thumb: Option<String>,
    #[serde(default)]
    pub str_tags: Option<String>,
    #[serde(default)]
    pub str_instructions: Option<String>,
    #[serde(default)]
    pub str_youtube: Option<String>,
    /// `strIngredientN` / `strMeasureN` slots and anything else we don't model
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

fn text(field: &Option<String>) -> String {
    field.clone().unwrap_or_default()
}

impl MealRecord {
    fn slot(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }

    /// Non-blank ingredients in slot order, each with its measure
    pub fn ingredients(&self) -> Vec<Ingredient> {
        (1..=INGREDIENT_SLOTS)
            .filter_map(|n| {
                let name = self.slot(&format!("strIngredient{n}"))?.trim();
                if name.is_empty() {
                    return None;
                }
                let measure = self
                    .slot(&format!("strMeasure{n}"))
                    .unwrap_or_default()
                    .trim();
                Some(Ingredient {
                    name: name.to_string(),
                    measure: measure.to_string(),
                })
            })
            .collect()
    }

    pub fn to_recipe(&self) -> Recipe {
        Recipe {
            id: self.id_meal.clone(),
            name: text(&self.str_meal),
            area: text(&self.str_area),
            category: text(&self.str_category),
            thumbnail: text(&self.str_meal_thumb),
            tags: text(&self.str_tags),
            instructions: text(&self.str_instructions),
            youtube: text(&self.str_youtube),
        }
    }

    pub fn to_details(&self) -> RecipeDetails {
        let recipe = self.to_recipe();
        RecipeDetails {
            id: recipe.id,
            name: recipe.name,
            area: recipe.area,
            category: recipe.category,
            thumbnail: recipe.thumbnail,
            tags: recipe.tags,
            instructions: recipe.instructions,
            youtube: recipe.youtube,
            ingredients: self.ingredients(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_null_meals() {
        let envelope: MealsEnvelope = serde_json::from_str(r#"{"meals": null}"#).unwrap();
        assert!(envelope.meals.is_none());

        let envelope: MealsEnvelope = serde_json::from_str("{}").unwrap();
        assert!(envelope.meals.is_none());
    }

    #[test]
    fn test_parse_meal_with_ingredient_slots() {
        let json = r#"{
            "meals": [{
                "idMeal": "52771",
                "strMeal": "Spicy Arrabiata Penne",
                "strArea": "Italian",
                "strCategory": "Vegetarian",
                "strMealThumb": "https://www.themealdb.com/images/media/meals/ustsqw1468250014.jpg",
                "strTags": "Pasta,Curry",
                "strInstructions": "Bring a large pot of water to a boil.",
                "strYoutube": "https://www.youtube.com/watch?v=1IszT_guI08",
                "strIngredient1": "penne rigate",
                "strIngredient2": "olive oil",
                "strIngredient3": "",
                "strIngredient4": null,
                "strIngredient5": "basil",
                "strMeasure1": "1 pound",
                "strMeasure2": "1/4 cup",
                "strMeasure3": "",
                "strMeasure4": null,
                "strMeasure5": null,
                "dateModified": null
            }]
        }"#;

        let envelope: MealsEnvelope = serde_json::from_str(json).unwrap();
        let meals = envelope.meals.unwrap();
        let details = meals[0].to_details();

        assert_eq!(details.id, "52771");
        assert_eq!(details.area, "Italian");
        assert_eq!(
            details.ingredients,
            vec![
                Ingredient {
                    name: "penne rigate".to_string(),
                    measure: "1 pound".to_string()
                },
                Ingredient {
                    name: "olive oil".to_string(),
                    measure: "1/4 cup".to_string()
                },
                Ingredient {
                    name: "basil".to_string(),
                    measure: String::new()
                },
            ]
        );
    }

    #[test]
    fn test_null_text_fields_become_empty() {
        let record: MealRecord =
            serde_json::from_str(r#"{"idMeal": "1", "strMeal": "Soup", "strTags": null}"#)
                .unwrap();
        let recipe = record.to_recipe();
        assert_eq!(recipe.name, "Soup");
        assert_eq!(recipe.tags, "");
        assert_eq!(recipe.youtube, "");
    }
}
