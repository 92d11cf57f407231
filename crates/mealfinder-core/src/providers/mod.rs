// Recipe source implementations
pub mod mealdb;

pub use mealdb::MealDbSource;
