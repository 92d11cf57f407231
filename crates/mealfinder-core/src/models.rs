use chrono::{DateTime, Days, LocalResult, NaiveDate, NaiveTime, Offset, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::expiry::UrgencyTier;
use crate::{Error, Result};

/// One perishable in the pantry
///
/// Field names on the wire match what the browser app wrote to
/// `localStorage["mf_ingredients"]`, so old pantries load unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngredientRecord {
    pub id: String,
    pub name: String,
    /// Only the calendar date matters; time of day is ignored when classifying
    #[serde(rename = "expiryISO")]
    pub expiry: DateTime<Utc>,
}

/// A record plus its freshness, as produced by a listing
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TrackedIngredient {
    #[serde(flatten)]
    pub record: IngredientRecord,
    pub days_left: i64,
    pub tier: UrgencyTier,
}

/// How the user said when something expires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpirySpec {
    /// An absolute calendar date
    OnDate(NaiveDate),
    /// Days from now, may be negative
    InDays(i64),
}

impl ExpirySpec {
    /// Parse a `YYYY-MM-DD` date as typed by the user
    pub fn parse_date(input: &str) -> Result<Self> {
        let input = input.trim();
        NaiveDate::parse_from_str(input, "%Y-%m-%d")
            .map(ExpirySpec::OnDate)
            .map_err(|_| Error::Validation(format!("'{}' is not a date (expected YYYY-MM-DD)", input)))
    }

    /// Parse a whole number of days
    pub fn parse_days(input: &str) -> Result<Self> {
        let input = input.trim();
        input
            .parse::<i64>()
            .map(ExpirySpec::InDays)
            .map_err(|_| Error::Validation(format!("'{}' is not a whole number of days", input)))
    }

    /// Resolve to an absolute instant relative to `now`
    ///
    /// Absolute dates become local midnight in `now`'s time zone so the
    /// date reads back the same in that zone. Day offsets move the calendar
    /// date and keep the wall-clock time, so a DST change in between
    /// doesn't shift the answer by a day.
    pub fn resolve<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<DateTime<Utc>> {
        match *self {
            ExpirySpec::OnDate(date) => now
                .timezone()
                .from_local_datetime(&date.and_time(NaiveTime::MIN))
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or_else(|| Error::Validation(format!("{} has no local midnight", date))),
            ExpirySpec::InDays(days) => {
                let local = now.naive_local();
                let shifted = if days >= 0 {
                    local.checked_add_days(Days::new(days.unsigned_abs()))
                } else {
                    local.checked_sub_days(Days::new(days.unsigned_abs()))
                };
                shifted
                    .and_then(|naive| match now.timezone().from_local_datetime(&naive) {
                        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
                            Some(dt.with_timezone(&Utc))
                        }
                        // Wall time skipped by a DST jump: keep today's offset
                        LocalResult::None => {
                            let offset = now.offset().fix().local_minus_utc();
                            TimeDelta::try_seconds(i64::from(offset))
                                .and_then(|delta| naive.checked_sub_signed(delta))
                                .map(|utc| Utc.from_utc_datetime(&utc))
                        }
                    })
                    .ok_or_else(|| Error::Validation(format!("{} days is out of range", days)))
            }
        }
    }
}

/// A search hit, enough to list it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeSummary {
    pub id: String,
    pub name: String,
    pub thumbnail: Option<String>,
}

/// One line of a recipe's ingredient list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngredientMeasure {
    pub ingredient: String,
    /// Empty when the API gives no quantity
    pub measure: String,
}

/// Everything needed to show a recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeDetail {
    pub id: String,
    pub name: String,
    pub thumbnail: Option<String>,
    pub instructions: String,
    pub ingredients: Vec<IngredientMeasure>,
    pub category: Option<String>,
    pub area: Option<String>,
    pub tags: Vec<String>,
    pub youtube: Option<String>,
    pub source: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expiry::days_until;
    use chrono::FixedOffset;
    use chrono_tz::America::New_York;

    #[test]
    fn test_record_uses_legacy_field_names() {
        let json = r#"{"id":"1717171717171","name":"Milk","expiryISO":"2024-06-01T00:00:00.000Z"}"#;
        let record: IngredientRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "1717171717171");
        assert_eq!(record.expiry, Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());

        let back = serde_json::to_string(&record).unwrap();
        assert!(back.contains("\"expiryISO\""));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            ExpirySpec::parse_date(" 2024-02-29 ").unwrap(),
            ExpirySpec::OnDate(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
        assert!(matches!(ExpirySpec::parse_date("2023-02-29"), Err(Error::Validation(_))));
        assert!(matches!(ExpirySpec::parse_date(""), Err(Error::Validation(_))));
    }

    #[test]
    fn test_parse_days() {
        assert_eq!(ExpirySpec::parse_days("5").unwrap(), ExpirySpec::InDays(5));
        assert_eq!(ExpirySpec::parse_days("-3").unwrap(), ExpirySpec::InDays(-3));
        assert!(matches!(ExpirySpec::parse_days("five"), Err(Error::Validation(_))));
        assert!(matches!(ExpirySpec::parse_days("2.5"), Err(Error::Validation(_))));
    }

    #[test]
    fn test_resolve_date_is_local_midnight() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2024, 5, 1, 15, 30, 0).unwrap();
        let spec = ExpirySpec::OnDate(NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());

        let expiry = spec.resolve(&now).unwrap();
        assert_eq!(expiry, Utc.with_ymd_and_hms(2024, 5, 9, 22, 0, 0).unwrap());
        assert_eq!(expiry.with_timezone(&tz).date_naive(), NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());
    }

    #[test]
    fn test_resolve_days_offsets_now() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        assert_eq!(
            ExpirySpec::InDays(3).resolve(&now).unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 4, 8, 0, 0).unwrap()
        );
        assert_eq!(
            ExpirySpec::InDays(-2).resolve(&now).unwrap(),
            Utc.with_ymd_and_hms(2024, 4, 29, 8, 0, 0).unwrap()
        );
        assert!(matches!(ExpirySpec::InDays(i64::MAX).resolve(&now), Err(Error::Validation(_))));
        assert!(matches!(ExpirySpec::InDays(i64::MIN).resolve(&now), Err(Error::Validation(_))));
    }

    #[test]
    fn test_resolve_days_across_dst_change() {
        let tz = New_York;

        // Clocks fall back overnight; the next day is 25 hours away
        let now = tz.with_ymd_and_hms(2024, 11, 3, 0, 30, 0).unwrap();
        let expiry = ExpirySpec::InDays(1).resolve(&now).unwrap();
        assert_eq!(expiry.with_timezone(&tz).date_naive(), NaiveDate::from_ymd_opt(2024, 11, 4).unwrap());
        assert_eq!(days_until(&expiry, &now), 1);

        // Going backwards over the same night
        let now = tz.with_ymd_and_hms(2024, 11, 4, 0, 30, 0).unwrap();
        let expiry = ExpirySpec::InDays(-1).resolve(&now).unwrap();
        assert_eq!(expiry.with_timezone(&tz).date_naive(), NaiveDate::from_ymd_opt(2024, 11, 3).unwrap());

        // Clocks spring forward; the next day is 23 hours away
        let now = tz.with_ymd_and_hms(2024, 3, 10, 0, 30, 0).unwrap();
        let expiry = ExpirySpec::InDays(1).resolve(&now).unwrap();
        assert_eq!(days_until(&expiry, &now), 1);
    }

    #[test]
    fn test_resolve_days_onto_missing_or_repeated_wall_time() {
        let tz = New_York;

        // 02:30 doesn't exist on 2024-03-10
        let now = tz.with_ymd_and_hms(2024, 3, 9, 2, 30, 0).unwrap();
        let expiry = ExpirySpec::InDays(1).resolve(&now).unwrap();
        assert_eq!(expiry.with_timezone(&tz).date_naive(), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());

        // 01:30 happens twice on 2024-11-03
        let now = tz.with_ymd_and_hms(2024, 11, 2, 1, 30, 0).unwrap();
        let expiry = ExpirySpec::InDays(1).resolve(&now).unwrap();
        assert_eq!(expiry.with_timezone(&tz).date_naive(), NaiveDate::from_ymd_opt(2024, 11, 3).unwrap());
        assert_eq!(days_until(&expiry, &now), 1);
    }
}
