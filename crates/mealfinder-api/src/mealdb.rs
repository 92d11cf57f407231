use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::models::{parse_meals, MealDetail, MealSummary};

const MEALDB_API_BASE: &str = "https://www.themealdb.com/api/json/v1/1";
const MEALDB_IMAGE_BASE: &str = "https://www.themealdb.com/images/ingredients";

#[derive(Error, Debug)]
pub enum MealDbError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MealDbError>;

/// Client for the two read-only TheMealDB endpoints we consume
///
/// No retries and no timeout: a failed request surfaces straight away.
pub struct MealDbClient {
    client: reqwest::Client,
    base_url: String,
}

impl MealDbClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(MEALDB_API_BASE.to_string())
    }

    /// Point at a mirror or a local stub server
    pub fn with_base_url(base_url: String) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("MealFinder/0.1.0"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Meals that use the given main ingredient
    pub async fn filter_by_ingredient(&self, ingredient: &str) -> Result<Vec<MealSummary>> {
        self.get_meals("filter.php", ingredient).await
    }

    /// Full meal record, `None` when the id is unknown
    pub async fn lookup_meal(&self, id: &str) -> Result<Option<MealDetail>> {
        let meals: Vec<MealDetail> = self.get_meals("lookup.php", id).await?;
        Ok(meals.into_iter().next())
    }

    async fn get_meals<T: DeserializeOwned>(&self, endpoint: &str, param: &str) -> Result<Vec<T>> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("GET {}?i={}", url, param);

        let response = self.client.get(&url).query(&[("i", param)]).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MealDbError::RequestFailed(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        let meals = parse_meals(&body)?;
        debug!("{} returned {} meals for {:?}", endpoint, meals.len(), param);
        Ok(meals)
    }
}

/// Thumbnail TheMealDB hosts for an ingredient name
pub fn ingredient_image_url(name: &str) -> String {
    format!("{}/{}.png", MEALDB_IMAGE_BASE, urlencoding::encode(name.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = MealDbClient::new().unwrap();
        assert_eq!(client.base_url(), MEALDB_API_BASE);
    }

    #[test]
    fn test_custom_base_url_drops_trailing_slash() {
        let client = MealDbClient::with_base_url("http://localhost:8080/api/".to_string()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api");
    }

    #[test]
    fn test_ingredient_image_url_is_encoded() {
        assert_eq!(
            ingredient_image_url(" Chicken Breast "),
            "https://www.themealdb.com/images/ingredients/Chicken%20Breast.png"
        );
    }
}
