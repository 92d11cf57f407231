// TheMealDB provider - bridges the API client with the RecipeSource trait
use async_trait::async_trait;
use mealfinder_api::{MealDbClient, MealDetail, MealSummary};

use crate::{
    models::{IngredientMeasure, RecipeDetail, RecipeSummary},
    search::RecipeSource,
    Result,
};

/// Wrapper around MealDbClient that implements RecipeSource
pub struct MealDbSource {
    client: MealDbClient,
}

impl MealDbSource {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: MealDbClient::new()?,
        })
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: MealDbClient::with_base_url(base_url.to_string())?,
        })
    }
}

#[async_trait]
impl RecipeSource for MealDbSource {
    async fn filter_by_ingredient(&self, ingredient: &str) -> Result<Vec<RecipeSummary>> {
        let meals = self.client.filter_by_ingredient(ingredient).await?;
        Ok(meals.into_iter().map(meal_to_summary).collect())
    }

    async fn lookup(&self, id: &str) -> Result<Option<RecipeDetail>> {
        let meal = self.client.lookup_meal(id).await?;
        Ok(meal.map(meal_to_detail))
    }
}

/// Convert a filter row to our RecipeSummary
fn meal_to_summary(meal: MealSummary) -> RecipeSummary {
    RecipeSummary {
        id: meal.id_meal,
        name: meal.str_meal,
        thumbnail: non_blank(meal.str_meal_thumb),
    }
}

/// Convert a full meal to our RecipeDetail, flattening the numbered slots
fn meal_to_detail(meal: MealDetail) -> RecipeDetail {
    let ingredients = meal
        .ingredients()
        .into_iter()
        .map(|(ingredient, measure)| IngredientMeasure { ingredient, measure })
        .collect();
    let tags = meal.tags();

    RecipeDetail {
        id: meal.id_meal,
        name: meal.str_meal,
        thumbnail: non_blank(meal.str_meal_thumb),
        instructions: meal.str_instructions.unwrap_or_default(),
        ingredients,
        category: non_blank(meal.str_category),
        area: non_blank(meal.str_area),
        tags,
        youtube: non_blank(meal.str_youtube),
        source: non_blank(meal.str_source),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use mealfinder_api::models::parse_meals;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_meal_to_summary() {
        let meals: Vec<MealSummary> = parse_meals(
            r#"{"meals":[{"strMeal":"Kedgeree","strMealThumb":"","idMeal":"52887"}]}"#,
        )
        .unwrap();

        let summary = meal_to_summary(meals.into_iter().next().unwrap());
        assert_eq!(summary.id, "52887");
        assert_eq!(summary.name, "Kedgeree");
        assert_eq!(summary.thumbnail, None);
    }

    #[test]
    fn test_meal_to_detail() {
        let meals: Vec<MealDetail> = parse_meals(
            r#"{"meals":[{
                "idMeal":"52887",
                "strMeal":"Kedgeree",
                "strCategory":"Seafood",
                "strArea":"British",
                "strInstructions":"For the rice, heat the oil.",
                "strMealThumb":"https://www.themealdb.com/images/media/meals/utxqpt1511639216.jpg",
                "strTags":"Brunch,Fish",
                "strYoutube":"",
                "strIngredient1":"Smoked Haddock",
                "strIngredient2":"Rice",
                "strIngredient3":"",
                "strMeasure1":"300g",
                "strMeasure2":"300g",
                "strMeasure3":"",
                "strSource":"http://www.bbc.co.uk/food/recipes/kedgeree_13291"
            }]}"#,
        )
        .unwrap();

        let detail = meal_to_detail(meals.into_iter().next().unwrap());
        assert_eq!(detail.id, "52887");
        assert_eq!(detail.category.as_deref(), Some("Seafood"));
        assert_eq!(detail.youtube, None);
        assert_eq!(detail.tags, vec!["Brunch", "Fish"]);
        assert_eq!(
            detail.ingredients,
            vec![
                IngredientMeasure {
                    ingredient: "Smoked Haddock".to_string(),
                    measure: "300g".to_string(),
                },
                IngredientMeasure {
                    ingredient: "Rice".to_string(),
                    measure: "300g".to_string(),
                },
            ]
        );
        assert!(detail.source.is_some());
    }

    #[test]
    fn test_missing_instructions_become_empty() {
        let meals: Vec<MealDetail> =
            parse_meals(r#"{"meals":[{"idMeal":"1","strMeal":"Toast"}]}"#).unwrap();

        let detail = meal_to_detail(meals.into_iter().next().unwrap());
        assert_eq!(detail.instructions, "");
        assert!(detail.ingredients.is_empty());
        assert!(detail.tags.is_empty());
    }

    #[tokio::test]
    async fn test_http_failure_is_remote_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/filter.php"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let source = MealDbSource::with_base_url(&server.uri()).unwrap();
        let result = source.filter_by_ingredient("rice").await;

        assert!(matches!(result, Err(Error::RemoteFetch(_))));
    }

    #[tokio::test]
    async fn test_lookup_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/lookup.php"))
            .and(query_param("i", "52887"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"meals":[{"idMeal":"52887","strMeal":"Kedgeree","strYoutube":" "}]}"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/lookup.php"))
            .and(query_param("i", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"meals":null}"#))
            .mount(&server)
            .await;

        let source = MealDbSource::with_base_url(&server.uri()).unwrap();

        let detail = source.lookup("52887").await.unwrap().unwrap();
        assert_eq!(detail.name, "Kedgeree");
        assert_eq!(detail.youtube, None);
        assert_eq!(source.lookup("1").await.unwrap(), None);
    }
}
