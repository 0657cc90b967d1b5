use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_email": "rina@gmail.com",
        "reason": "Family event",
        "start_date": "2025-01-05",
        "end_date": "2025-01-05",
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-01T00:00:00Z"
    })
)]
pub struct LeaveRequest {
    #[schema(example = 1)]
    pub id: u64,

    /// Email of the employee who owns this record; immutable after creation.
    #[schema(example = "rina@gmail.com")]
    pub employee_email: String,

    #[schema(example = "Family event")]
    pub reason: String,

    #[schema(example = "2025-01-05", value_type = String, format = "date")]
    pub start_date: NaiveDate,

    #[schema(example = "2025-01-05", value_type = String, format = "date")]
    pub end_date: NaiveDate,

    #[schema(example = "2025-01-01T00:00:00Z", value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,

    #[schema(example = "2025-01-01T00:00:00Z", value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
}

impl LeaveRequest {
    /// Inclusive day count of this record: `end_date - start_date + 1`.
    pub fn span_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// A record is ongoing while today falls inside `[start_date, end_date]`,
    /// both bounds included. The start day itself already counts.
    pub fn is_ongoing(&self, today: NaiveDate) -> bool {
        self.start_date <= today && today <= self.end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(start: &str, end: &str) -> LeaveRequest {
        let ts = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        LeaveRequest {
            id: 1,
            employee_email: "rina@gmail.com".into(),
            reason: "Family event".into(),
            start_date: NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap(),
            end_date: NaiveDate::parse_from_str(end, "%Y-%m-%d").unwrap(),
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn span_counts_both_endpoints() {
        assert_eq!(record("2025-02-01", "2025-02-01").span_days(), 1);
        assert_eq!(record("2025-02-01", "2025-02-12").span_days(), 12);
    }

    #[test]
    fn ongoing_is_inclusive_on_both_bounds() {
        let leave = record("2025-02-10", "2025-02-12");
        let day = |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        assert!(!leave.is_ongoing(day("2025-02-09")));
        assert!(leave.is_ongoing(day("2025-02-10")));
        assert!(leave.is_ongoing(day("2025-02-12")));
        assert!(!leave.is_ongoing(day("2025-02-13")));
    }
}
