use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Whole calendar days from `now` until `expiry`
///
/// Both instants are reduced to their date in `now`'s time zone first, so the
/// answer is the same at 00:01 and at 23:59. 0 means "expires today",
/// negative means already expired.
pub fn days_until<Tz: TimeZone>(expiry: &DateTime<Utc>, now: &DateTime<Tz>) -> i64 {
    let expiry_day = expiry.with_timezone(&now.timezone()).date_naive();
    let today = now.date_naive();
    (expiry_day - today).num_days()
}

/// How soon something needs using up
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyTier {
    /// Two days or fewer, expired included
    Critical,
    /// 3-6 days
    Warning,
    /// 7-14 days
    Caution,
    /// More than two weeks
    Ok,
}

impl UrgencyTier {
    pub fn from_days(days_left: i64) -> Self {
        match days_left {
            i64::MIN..=2 => UrgencyTier::Critical,
            3..=6 => UrgencyTier::Warning,
            7..=14 => UrgencyTier::Caution,
            _ => UrgencyTier::Ok,
        }
    }

    pub fn color_hex(&self) -> &'static str {
        match self {
            UrgencyTier::Critical => "#ef4444",
            UrgencyTier::Warning => "#fb923c",
            UrgencyTier::Caution => "#fbbf24",
            UrgencyTier::Ok => "#10b981",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UrgencyTier::Critical => "Critical",
            UrgencyTier::Warning => "Warning",
            UrgencyTier::Caution => "Caution",
            UrgencyTier::Ok => "OK",
        }
    }
}

impl std::fmt::Display for UrgencyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
