// Pantry tracking and recipe search live here - the fridge's memory
pub mod config;
pub mod error;
pub mod expiry;
pub mod models;
pub mod providers;
pub mod repository;
pub mod search;
pub mod store;

pub use config::Config;
pub use error::Error;
pub use expiry::{days_until, UrgencyTier};
pub use models::{
    ExpirySpec, IngredientMeasure, IngredientRecord, RecipeDetail, RecipeSummary,
    TrackedIngredient,
};
pub use providers::MealDbSource;
pub use repository::IngredientRepository;
pub use search::{RecipeSearchEngine, RecipeSource};
pub use store::{IngredientStore, JsonFileStore, MemoryStore};

/// Result type alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;
