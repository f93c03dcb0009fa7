use crate::model::{Order, OrderStatus, PaymentStatus};
use crate::order_actor::OrderError;
use chrono::{DateTime, NaiveDate, Utc};

/// Inclusive bounds on `created_at`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Parses optional query values. Each accepts RFC 3339 or a bare `YYYY-MM-DD`; a bare
    /// end date covers that whole day.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, OrderError> {
        Ok(Self {
            start: start
                .map(|s| parse_bound(s, "startDate", false))
                .transpose()?,
            end: end.map(|s| parse_bound(s, "endDate", true)).transpose()?,
        })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.map_or(true, |s| at >= s) && self.end.map_or(true, |e| at <= e)
    }
}

fn parse_bound(value: &str, field: &str, end_of_day: bool) -> Result<DateTime<Utc>, OrderError> {
    let value = value.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Ok(at.with_timezone(&Utc));
    }
    let day = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| OrderError::validation(field, "must be an RFC 3339 timestamp or YYYY-MM-DD"))?;
    let at = if end_of_day {
        day.and_hms_milli_opt(23, 59, 59, 999)
    } else {
        day.and_hms_opt(0, 0, 0)
    };
    at.map(|naive| naive.and_utc())
        .ok_or_else(|| OrderError::validation(field, "is out of range"))
}

/// Conjunctive filter for the admin listing. Unset fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub created: DateRange,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        self.status.map_or(true, |s| order.status == s)
            && self.payment_status.map_or(true, |p| order.payment_status == p)
            && self.created.contains(order.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_date_only_bounds_cover_whole_days() {
        let range = DateRange::parse(Some("2024-03-01"), Some("2024-03-31")).unwrap();
        let inside = Utc.with_ymd_and_hms(2024, 3, 31, 18, 0, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap();
        assert!(range.contains(inside));
        assert!(!range.contains(before));
    }

    #[test]
    fn test_rfc3339_bound() {
        let range = DateRange::parse(Some("2024-03-01T12:00:00+02:00"), None).unwrap();
        assert_eq!(
            range.start,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap())
        );
        assert_eq!(range.end, None);
    }

    #[test]
    fn test_bad_date_is_a_validation_error() {
        let err = DateRange::parse(None, Some("last tuesday")).unwrap_err();
        assert_eq!(err.kind(), "ValidationError");
        assert!(err.to_string().contains("endDate"));
    }
}
