use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// TheMealDB caps every meal at 20 ingredient/measure slots
pub const MAX_INGREDIENT_SLOTS: usize = 20;

/// A row from `filter.php` - just enough to draw a result card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MealSummary {
    pub id_meal: String,
    pub str_meal: String,
    #[serde(default)]
    pub str_meal_thumb: Option<String>,
}

/// A full meal from `lookup.php`
///
/// TheMealDB flattens the ingredient list into `strIngredient1..20` and
/// `strMeasure1..20`. Those keys land in `slots` and are only ever read
/// through [`MealDetail::ingredients`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealDetail {
    pub id_meal: String,
    pub str_meal: String,
    #[serde(default)]
    pub str_meal_thumb: Option<String>,
    #[serde(default)]
    pub str_instructions: Option<String>,
    #[serde(default)]
    pub str_category: Option<String>,
    #[serde(default)]
    pub str_area: Option<String>,
    #[serde(default)]
    pub str_tags: Option<String>,
    #[serde(default)]
    pub str_youtube: Option<String>,
    #[serde(default)]
    pub str_source: Option<String>,
    #[serde(flatten)]
    slots: HashMap<String, serde_json::Value>,
}

impl MealDetail {
    /// Ordered (ingredient, measure) pairs, empty slots skipped
    pub fn ingredients(&self) -> Vec<(String, String)> {
        (1..=MAX_INGREDIENT_SLOTS)
            .filter_map(|i| {
                let ingredient = self.slot(&format!("strIngredient{}", i))?;
                let measure = self
                    .slot(&format!("strMeasure{}", i))
                    .unwrap_or_default();
                Some((ingredient, measure))
            })
            .collect()
    }

    /// Comma separated `strTags`, blanks dropped
    pub fn tags(&self) -> Vec<String> {
        self.str_tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    }

    fn slot(&self, key: &str) -> Option<String> {
        match self.slots.get(key)? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }
}

/// Every TheMealDB endpoint wraps its rows in `{"meals": ...}`
#[derive(Debug, Deserialize)]
struct MealsEnvelope {
    #[serde(default)]
    meals: serde_json::Value,
}

/// Decode a `{"meals": ...}` body
///
/// The API answers "nothing found" with `null` (and a few endpoints with a
/// bare string), so anything that isn't an array is an empty result.
pub fn parse_meals<T: DeserializeOwned>(body: &str) -> serde_json::Result<Vec<T>> {
    let envelope: MealsEnvelope = serde_json::from_str(body)?;
    match envelope.meals {
        serde_json::Value::Array(rows) => serde_json::from_value(serde_json::Value::Array(rows)),
        _ => Ok(Vec::new()),
    }
}
