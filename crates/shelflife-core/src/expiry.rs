use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::Product;

/// Anything expiring within this many days (inclusive) counts as "soon"
pub const EXPIRING_SOON_DAYS: i64 = 30;

/// Urgency bucket for a product
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ExpiryStatus {
    /// Expiry date is strictly before today
    Expired,
    /// Expires today or within the next 30 days
    ExpiringSoon,
    /// More than 30 days left
    Valid,
}

impl ExpiryStatus {
    pub fn from_days_remaining(days: i64) -> Self {
        match days {
            d if d < 0 => ExpiryStatus::Expired,
            0..=EXPIRING_SOON_DAYS => ExpiryStatus::ExpiringSoon,
            _ => ExpiryStatus::Valid,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExpiryStatus::Expired => "Expired",
            ExpiryStatus::ExpiringSoon => "Expiring Soon",
            ExpiryStatus::Valid => "Valid",
        }
    }

    /// Hex colour shared by the chart and the list badges
    pub fn color_code(&self) -> &'static str {
        match self {
            ExpiryStatus::Expired => "#EF4444",
            ExpiryStatus::ExpiringSoon => "#F59E0B",
            ExpiryStatus::Valid => "#10B981",
        }
    }

    pub fn color_name(&self) -> &'static str {
        match self {
            ExpiryStatus::Expired => "red",
            ExpiryStatus::ExpiringSoon => "amber",
            ExpiryStatus::Valid => "green",
        }
    }

    pub fn all() -> [ExpiryStatus; 3] {
        [
            ExpiryStatus::Expired,
            ExpiryStatus::ExpiringSoon,
            ExpiryStatus::Valid,
        ]
    }
}

/// Result of classifying one expiry date against one "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry {
    /// Whole calendar days until expiry; negative once it's past
    pub days_remaining: i64,
    pub status: ExpiryStatus,
}

impl Expiry {
    /// Badge text for the list view
    pub fn status_text(&self) -> String {
        match self.days_remaining {
            d if d < 0 => format!("Expired {} days ago", d.abs()),
            0 => "Expires Today".to_string(),
            d if d <= EXPIRING_SOON_DAYS => format!("{} days left", d),
            _ => "Valid".to_string(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.status == ExpiryStatus::Expired
    }
}

/// Classify an expiry date relative to `now`.
///
/// `now` is truncated to its calendar day first, so the answer only changes at
/// midnight. Dates have no time component, which makes the day difference an
/// exact integer and the ceiling a no-op.
pub fn classify(expiry_date: NaiveDate, now: NaiveDateTime) -> Expiry {
    classify_on(expiry_date, now.date())
}

/// Same as [`classify`] for callers that already hold today's date
pub fn classify_on(expiry_date: NaiveDate, today: NaiveDate) -> Expiry {
    let days_remaining = (expiry_date - today).num_days();

    Expiry {
        days_remaining,
        status: ExpiryStatus::from_days_remaining(days_remaining),
    }
}

impl Product {
    pub fn expiry(&self, now: NaiveDateTime) -> Expiry {
        classify(self.expiry_date, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveTime};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    }

    fn today() -> NaiveDate {
        now().date()
    }

    #[test]
    fn test_status_from_days_remaining() {
        assert_eq!(ExpiryStatus::from_days_remaining(-400), ExpiryStatus::Expired);
        assert_eq!(ExpiryStatus::from_days_remaining(-1), ExpiryStatus::Expired);
        assert_eq!(ExpiryStatus::from_days_remaining(0), ExpiryStatus::ExpiringSoon);
        assert_eq!(ExpiryStatus::from_days_remaining(30), ExpiryStatus::ExpiringSoon);
        assert_eq!(ExpiryStatus::from_days_remaining(31), ExpiryStatus::Valid);
    }

    #[test]
    fn test_boundaries() {
        let expiry = classify(today(), now());
        assert_eq!(expiry.status, ExpiryStatus::ExpiringSoon);
        assert_eq!(expiry.days_remaining, 0);

        let expiry = classify(today() + Duration::days(30), now());
        assert_eq!(expiry.status, ExpiryStatus::ExpiringSoon);
        assert_eq!(expiry.days_remaining, 30);

        let expiry = classify(today() + Duration::days(31), now());
        assert_eq!(expiry.status, ExpiryStatus::Valid);

        let expiry = classify(today() - Duration::days(1), now());
        assert_eq!(expiry.status, ExpiryStatus::Expired);
        assert_eq!(expiry.days_remaining, -1);
    }

    #[test]
    fn test_expired_iff_before_today() {
        let start = today() - Duration::days(60);
        for offset in 0..120 {
            let date = start + Duration::days(offset);
            let expired = classify(date, now()).status == ExpiryStatus::Expired;
            assert_eq!(expired, date < today(), "date {}", date);
        }
    }

    #[test]
    fn test_time_of_day_does_not_matter() {
        let date = today() + Duration::days(3);
        let midnight = today().and_time(NaiveTime::MIN);
        let late = today().and_hms_opt(23, 59, 59).unwrap();

        assert_eq!(classify(date, midnight), classify(date, late));
        assert_eq!(classify(date, late).days_remaining, 3);
    }

    #[test]
    fn test_status_text() {
        let text = |days: i64| classify_on(today() + Duration::days(days), today()).status_text();

        assert_eq!(text(-12), "Expired 12 days ago");
        assert_eq!(text(0), "Expires Today");
        assert_eq!(text(1), "1 days left");
        assert_eq!(text(30), "30 days left");
        assert_eq!(text(31), "Valid");
    }

    #[test]
    fn test_colors() {
        assert_eq!(ExpiryStatus::Expired.color_code(), "#EF4444");
        assert_eq!(ExpiryStatus::ExpiringSoon.color_name(), "amber");
        assert_eq!(ExpiryStatus::Valid.label(), "Valid");
    }
}
