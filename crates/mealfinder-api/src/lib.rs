// TheMealDB client and its raw response shapes - all the JSON weirdness stays in here
pub mod mealdb;
pub mod models;

pub use mealdb::{ingredient_image_url, MealDbClient, MealDbError};
pub use models::{MealDetail, MealSummary};
