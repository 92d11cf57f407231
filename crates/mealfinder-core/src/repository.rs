// Pantry CRUD on top of whichever store was handed in
use chrono::{DateTime, Local, TimeZone};
use tracing::{debug, info};
use uuid::Uuid;

use crate::expiry::{days_until, UrgencyTier};
use crate::models::{ExpirySpec, IngredientRecord, TrackedIngredient};
use crate::store::IngredientStore;
use crate::{Error, Result};

pub struct IngredientRepository<S: IngredientStore> {
    store: S,
}

impl<S: IngredientStore> IngredientRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Add an ingredient expiring per `spec`, measured from the local clock
    pub fn add(&self, name: &str, spec: ExpirySpec) -> Result<IngredientRecord> {
        self.add_at(name, spec, &Local::now())
    }

    /// Same as [`add`](Self::add) with an explicit "now"
    pub fn add_at<Tz: TimeZone>(
        &self,
        name: &str,
        spec: ExpirySpec,
        now: &DateTime<Tz>,
    ) -> Result<IngredientRecord> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("Ingredient name cannot be empty".into()));
        }

        let record = IngredientRecord {
            // v7 ids sort by creation time and stay unique within a millisecond
            id: Uuid::now_v7().to_string(),
            name: name.to_string(),
            expiry: spec.resolve(now)?,
        };

        let mut records = self.store.load();
        records.push(record.clone());
        self.store.save(&records)?;

        info!("Added {} (expires {})", record.name, record.expiry.date_naive());
        Ok(record)
    }

    /// Drop the record with `id`; returns whether one was there
    pub fn remove(&self, id: &str) -> Result<bool> {
        let mut records = self.store.load();
        let before = records.len();
        records.retain(|r| r.id != id);
        let removed = records.len() != before;

        self.store.save(&records)?;

        if removed {
            info!("Removed ingredient {}", id);
        } else {
            debug!("No ingredient with id {}", id);
        }
        Ok(removed)
    }

    /// Everything in the pantry, most urgent first
    ///
    /// Ties keep the order the ingredients were added in.
    pub fn list<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<TrackedIngredient> {
        let mut tracked: Vec<TrackedIngredient> = self
            .store
            .load()
            .into_iter()
            .map(|record| {
                let days_left = days_until(&record.expiry, now);
                TrackedIngredient {
                    record,
                    days_left,
                    tier: UrgencyTier::from_days(days_left),
                }
            })
            .collect();

        // sort_by_key is stable
        tracked.sort_by_key(|t| t.days_left);
        tracked
    }

    /// Saved names in the order they were added
    pub fn names(&self) -> Vec<String> {
        self.store.load().into_iter().map(|r| r.name).collect()
    }
}
