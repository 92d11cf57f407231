use thiserror::Error;

/// All the ways things can go wrong in MealFinder
///
/// thiserror writes the Display impls for us. Life's too short to hand-roll
/// those for six variants.
///
/// Not-found is never an error here: lookups return `None` and searches an
/// empty `Vec`. An empty fridge isn't a failure.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Only raised inside the store; `load` recovers from it with an empty pantry
    #[error("Stored ingredients are unreadable: {0}")]
    StorageCorrupted(String),

    #[error("Recipe API request failed: {0}")]
    RemoteFetch(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<mealfinder_api::MealDbError> for Error {
    fn from(err: mealfinder_api::MealDbError) -> Self {
        Error::RemoteFetch(err.to_string())
    }
}
