use chrono::{Datelike, NaiveDate};
use derive_more::Display;

use crate::model::leave_request::LeaveRequest;

/// Leave quota policy. All three caps are configuration (see `Config`),
/// not literals: the per-request and monthly caps are both 1 day by policy,
/// which limits an employee to one single-day leave per month.
#[derive(Debug, Clone)]
pub struct LeavePolicy {
    pub max_span_days: i64,
    pub monthly_cap_days: i64,
    pub yearly_cap_days: i64,
}

impl Default for LeavePolicy {
    fn default() -> Self {
        Self {
            max_span_days: 1,
            monthly_cap_days: 1,
            yearly_cap_days: 12,
        }
    }
}

/// Dates of a leave request being created or, after patch-merging, updated.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Candidate {
    pub fn span_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// Why a candidate request was rejected. Display text is what the caller
/// sees in the 400 response body.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum RuleViolation {
    #[display(fmt = "End date cannot be before start date")]
    InvalidRange,

    #[display(fmt = "Maximum of {} day(s) leave per request", _0)]
    SpanExceeded(i64),

    #[display(fmt = "Leave dates overlap an existing leave from {} to {}", _0, _1)]
    OverlapConflict(NaiveDate, NaiveDate),

    #[display(
        fmt = "Monthly leave limit of {} day(s) exceeded, {} day(s) already taken this month",
        cap,
        taken
    )]
    MonthlyCapExceeded { cap: i64, taken: i64 },

    #[display(
        fmt = "Yearly leave limit of {} days exceeded, {} day(s) already taken this year",
        cap,
        taken
    )]
    YearlyCapExceeded { cap: i64, taken: i64 },
}

/// Evaluates a candidate request against the employee's existing records.
///
/// Pure: the orchestrator fetches the records (at least every record whose
/// interval touches the candidate's calendar year) and hands them in here;
/// this function never touches the store. `exclude_id` carries the id of
/// the record being updated so it does not conflict with itself.
///
/// Checks run in a fixed order and stop at the first failure, so the
/// reported reason is deterministic: range, span cap, overlap, monthly cap,
/// yearly cap.
pub fn evaluate(
    policy: &LeavePolicy,
    candidate: &Candidate,
    existing: &[LeaveRequest],
    exclude_id: Option<u64>,
) -> Result<(), RuleViolation> {
    if candidate.end_date < candidate.start_date {
        return Err(RuleViolation::InvalidRange);
    }

    let requested = candidate.span_days();
    if requested > policy.max_span_days {
        return Err(RuleViolation::SpanExceeded(policy.max_span_days));
    }

    let others = existing.iter().filter(|r| Some(r.id) != exclude_id);

    if let Some(hit) = others
        .clone()
        .find(|r| r.start_date <= candidate.end_date && r.end_date >= candidate.start_date)
    {
        return Err(RuleViolation::OverlapConflict(hit.start_date, hit.end_date));
    }

    // Quota windows key on the month/year the record *starts* in, matching
    // the accounting the store query uses.
    let taken_this_month: i64 = others
        .clone()
        .filter(|r| {
            r.start_date.year() == candidate.start_date.year()
                && r.start_date.month() == candidate.start_date.month()
        })
        .map(|r| r.span_days())
        .sum();
    if taken_this_month + requested > policy.monthly_cap_days {
        return Err(RuleViolation::MonthlyCapExceeded {
            cap: policy.monthly_cap_days,
            taken: taken_this_month,
        });
    }

    let taken_this_year: i64 = others
        .filter(|r| r.start_date.year() == candidate.start_date.year())
        .map(|r| r.span_days())
        .sum();
    if taken_this_year + requested > policy.yearly_cap_days {
        return Err(RuleViolation::YearlyCapExceeded {
            cap: policy.yearly_cap_days,
            taken: taken_this_year,
        });
    }

    Ok(())
}
