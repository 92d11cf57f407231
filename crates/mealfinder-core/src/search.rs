use std::collections::{BTreeSet, HashSet};

use futures::future::try_join_all;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};

use crate::models::{RecipeDetail, RecipeSummary};
use crate::Result;

/// Default number of detail lookups in flight at once
pub const DEFAULT_LOOKUP_CONCURRENCY: usize = 4;

/// Where recipes come from - TheMealDB in production, a mock in tests
///
/// "Nothing found" is `Ok(vec![])` / `Ok(None)`; `Err` is reserved for the
/// request itself failing.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecipeSource: Send + Sync {
    async fn filter_by_ingredient(&self, ingredient: &str) -> Result<Vec<RecipeSummary>>;
    async fn lookup(&self, id: &str) -> Result<Option<RecipeDetail>>;
}

/// Ingredient-driven recipe search
///
/// Stateless: every call goes to the source, nothing is cached.
pub struct RecipeSearchEngine<R: RecipeSource> {
    source: R,
    lookup_concurrency: usize,
}

impl<R: RecipeSource> RecipeSearchEngine<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            lookup_concurrency: DEFAULT_LOOKUP_CONCURRENCY,
        }
    }

    /// Cap how many detail lookups run at once (minimum 1)
    pub fn with_lookup_concurrency(mut self, limit: usize) -> Self {
        self.lookup_concurrency = limit.max(1);
        self
    }

    pub fn source(&self) -> &R {
        &self.source
    }

    /// Recipes that use `ingredient`
    pub async fn search_by_ingredient(&self, ingredient: &str) -> Result<Vec<RecipeSummary>> {
        let ingredient = ingredient.trim();
        if ingredient.is_empty() {
            return Ok(Vec::new());
        }

        let results = self.source.filter_by_ingredient(ingredient).await?;
        debug!("{} recipes use {}", results.len(), ingredient);
        Ok(results)
    }

    /// Full recipe, or `None` if the id is unknown
    pub async fn lookup_detail(&self, id: &str) -> Result<Option<RecipeDetail>> {
        self.source.lookup(id.trim()).await
    }

    /// Recipes that use every one of `names`, fully resolved
    ///
    /// Names are trimmed and de-duplicated; all per-ingredient searches run
    /// concurrently. If any ingredient has no recipes the answer is empty
    /// and no details are fetched. Results follow the order of the
    /// alphabetically first ingredient's search; ids whose lookup comes back
    /// empty are dropped.
    pub async fn search_by_multiple_ingredients<I, T>(&self, names: I) -> Result<Vec<RecipeDetail>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let names: BTreeSet<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();

        if names.is_empty() {
            return Ok(Vec::new());
        }

        let result_sets = try_join_all(
            names
                .iter()
                .map(|name| self.source.filter_by_ingredient(name)),
        )
        .await?;

        let ids = intersect_ids(&result_sets);
        info!(
            "{} recipes use all of {:?}",
            ids.len(),
            names.iter().collect::<Vec<_>>()
        );
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let source = &self.source;
        let details: Vec<Option<RecipeDetail>> = stream::iter(ids)
            .map(|id| async move { source.lookup(&id).await })
            .buffered(self.lookup_concurrency)
            .try_collect()
            .await?;

        Ok(details.into_iter().flatten().collect())
    }
}

/// Ids present in every result set, in first-set order, without repeats
fn intersect_ids(result_sets: &[Vec<RecipeSummary>]) -> Vec<String> {
    let Some((first, rest)) = result_sets.split_first() else {
        return Vec::new();
    };
    if result_sets.iter().any(|set| set.is_empty()) {
        return Vec::new();
    }

    let others: Vec<HashSet<&str>> = rest
        .iter()
        .map(|set| set.iter().map(|r| r.id.as_str()).collect())
        .collect();

    let mut seen = HashSet::new();
    first
        .iter()
        .map(|r| r.id.as_str())
        .filter(|id| others.iter().all(|other| other.contains(id)))
        .filter(|id| seen.insert(*id))
        .map(String::from)
        .collect()
}
