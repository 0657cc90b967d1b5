use chrono::{Datelike, NaiveDate};

use crate::engine::rules::{self, Candidate, LeavePolicy};
use crate::error::ServiceError;
use crate::model::leave_request::LeaveRequest;
use crate::store::{EmployeeDirectory, LeaveStore, NewLeave};

/// Partial update for a leave record. Absent fields keep their current
/// value; the merge happens here, before re-validation.
#[derive(Debug, Default, Clone)]
pub struct LeavePatch {
    pub reason: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// The fetch window handed to the store: the candidate's whole calendar
/// year, widened to the candidate's own interval. One fetch serves the
/// overlap, monthly, and yearly checks.
fn quota_window(candidate: &Candidate) -> (NaiveDate, NaiveDate) {
    let year = candidate.start_date.year();
    let year_start = NaiveDate::from_ymd_opt(year, 1, 1).expect("valid year start");
    let year_end = NaiveDate::from_ymd_opt(year, 12, 31).expect("valid year end");
    (
        year_start.min(candidate.start_date),
        year_end.max(candidate.end_date),
    )
}

/// Creates a leave record after validating it against the employee's
/// existing records. Must run inside one transaction together with the
/// fetch, so a concurrent request cannot slip a conflicting record in
/// between validation and insert.
pub async fn apply_leave<S>(
    store: &mut S,
    policy: &LeavePolicy,
    input: NewLeave,
) -> Result<LeaveRequest, ServiceError>
where
    S: EmployeeDirectory + LeaveStore,
{
    store
        .find_employee(&input.employee_email)
        .await?
        .ok_or(ServiceError::NotFound("Employee"))?;

    let candidate = Candidate {
        start_date: input.start_date,
        end_date: input.end_date,
    };
    let (from, to) = quota_window(&candidate);
    let existing = store.find_in_range(&input.employee_email, from, to).await?;

    rules::evaluate(policy, &candidate, &existing, None)?;

    store.insert(&input).await
}

/// Patches a leave record. Rejected outright while the record is ongoing,
/// whatever fields the patch carries; otherwise the merged dates are
/// re-validated against the employee's *other* records.
pub async fn update_leave<S>(
    store: &mut S,
    policy: &LeavePolicy,
    today: NaiveDate,
    id: u64,
    patch: LeavePatch,
) -> Result<LeaveRequest, ServiceError>
where
    S: EmployeeDirectory + LeaveStore,
{
    let current = store
        .find_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound("Leave request"))?;

    if current.is_ongoing(today) {
        return Err(ServiceError::OngoingImmutable("updated"));
    }

    let mut merged = current;
    if let Some(reason) = patch.reason {
        merged.reason = reason;
    }
    if let Some(start_date) = patch.start_date {
        merged.start_date = start_date;
    }
    if let Some(end_date) = patch.end_date {
        merged.end_date = end_date;
    }

    let candidate = Candidate {
        start_date: merged.start_date,
        end_date: merged.end_date,
    };
    let (from, to) = quota_window(&candidate);
    let existing = store.find_in_range(&merged.employee_email, from, to).await?;

    rules::evaluate(policy, &candidate, &existing, Some(id))?;

    store.update(&merged).await
}

/// Physically removes a leave record, unless it is ongoing.
pub async fn delete_leave<S>(store: &mut S, today: NaiveDate, id: u64) -> Result<(), ServiceError>
where
    S: LeaveStore,
{
    let current = store
        .find_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound("Leave request"))?;

    if current.is_ongoing(today) {
        return Err(ServiceError::OngoingImmutable("deleted"));
    }

    store.delete(id).await
}

/// All records for one employee, most recent start date first. An unknown
/// employee is a NotFound; an employee with no records is a normal empty
/// result.
pub async fn list_for_employee<S>(
    store: &mut S,
    employee_email: &str,
) -> Result<Vec<LeaveRequest>, ServiceError>
where
    S: EmployeeDirectory + LeaveStore,
{
    store
        .find_employee(employee_email)
        .await?
        .ok_or(ServiceError::NotFound("Employee"))?;

    store.list_for_employee(employee_email).await
}

/// One page of all records plus the total count. Pagination bounds are
/// validated at the HTTP boundary.
pub async fn list_all<S>(
    store: &mut S,
    page: u64,
    per_page: u64,
) -> Result<(Vec<LeaveRequest>, i64), ServiceError>
where
    S: LeaveStore,
{
    store.list_page(page, per_page).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    use crate::model::employee::Employee;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    /// In-memory stand-in for the MySQL store, one instance per test
    /// "transaction".
    #[derive(Default)]
    struct MemStore {
        employees: Vec<Employee>,
        leaves: Vec<LeaveRequest>,
        next_id: u64,
    }

    impl MemStore {
        fn with_employee(email: &str) -> Self {
            MemStore {
                employees: vec![Employee {
                    email: email.into(),
                    first_name: "Rina".into(),
                    last_name: "Wati".into(),
                    phone: "+6281234567890".into(),
                    address: "Jl. Merdeka No. 1".into(),
                    gender: "F".into(),
                    created_at: ts(),
                    updated_at: ts(),
                }],
                leaves: Vec::new(),
                next_id: 1,
            }
        }

        fn seed(&mut self, email: &str, start: &str, end: &str) -> u64 {
            let id = self.next_id;
            self.next_id += 1;
            self.leaves.push(LeaveRequest {
                id,
                employee_email: email.into(),
                reason: "Family event".into(),
                start_date: date(start),
                end_date: date(end),
                created_at: ts(),
                updated_at: ts(),
            });
            id
        }
    }

    impl EmployeeDirectory for MemStore {
        async fn find_employee(&mut self, email: &str) -> Result<Option<Employee>, ServiceError> {
            Ok(self.employees.iter().find(|e| e.email == email).cloned())
        }
    }

    impl LeaveStore for MemStore {
        async fn find_by_id(&mut self, id: u64) -> Result<Option<LeaveRequest>, ServiceError> {
            Ok(self.leaves.iter().find(|l| l.id == id).cloned())
        }

        async fn find_in_range(
            &mut self,
            employee_email: &str,
            from: NaiveDate,
            to: NaiveDate,
        ) -> Result<Vec<LeaveRequest>, ServiceError> {
            Ok(self
                .leaves
                .iter()
                .filter(|l| {
                    l.employee_email == employee_email && l.start_date <= to && l.end_date >= from
                })
                .cloned()
                .collect())
        }

        async fn insert(&mut self, leave: &NewLeave) -> Result<LeaveRequest, ServiceError> {
            let id = self.next_id;
            self.next_id += 1;
            let record = LeaveRequest {
                id,
                employee_email: leave.employee_email.clone(),
                reason: leave.reason.clone(),
                start_date: leave.start_date,
                end_date: leave.end_date,
                created_at: ts(),
                updated_at: ts(),
            };
            self.leaves.push(record.clone());
            Ok(record)
        }

        async fn update(&mut self, leave: &LeaveRequest) -> Result<LeaveRequest, ServiceError> {
            let record = self
                .leaves
                .iter_mut()
                .find(|l| l.id == leave.id)
                .ok_or(ServiceError::Internal)?;
            record.reason = leave.reason.clone();
            record.start_date = leave.start_date;
            record.end_date = leave.end_date;
            Ok(record.clone())
        }

        async fn delete(&mut self, id: u64) -> Result<(), ServiceError> {
            self.leaves.retain(|l| l.id != id);
            Ok(())
        }

        async fn list_for_employee(
            &mut self,
            employee_email: &str,
        ) -> Result<Vec<LeaveRequest>, ServiceError> {
            let mut leaves: Vec<LeaveRequest> = self
                .leaves
                .iter()
                .filter(|l| l.employee_email == employee_email)
                .cloned()
                .collect();
            leaves.sort_by(|a, b| b.start_date.cmp(&a.start_date));
            Ok(leaves)
        }

        async fn list_page(
            &mut self,
            page: u64,
            per_page: u64,
        ) -> Result<(Vec<LeaveRequest>, i64), ServiceError> {
            let mut leaves = self.leaves.clone();
            leaves.sort_by(|a, b| b.start_date.cmp(&a.start_date));
            let total = leaves.len() as i64;
            let page = leaves
                .into_iter()
                .skip(((page - 1) * per_page) as usize)
                .take(per_page as usize)
                .collect();
            Ok((page, total))
        }
    }

    fn new_leave(email: &str, start: &str, end: &str) -> NewLeave {
        NewLeave {
            employee_email: email.into(),
            reason: "Family event".into(),
            start_date: date(start),
            end_date: date(end),
        }
    }

    const EMAIL: &str = "rina@gmail.com";

    #[actix_web::test]
    async fn apply_succeeds_with_no_history() {
        let mut store = MemStore::with_employee(EMAIL);
        let policy = LeavePolicy::default();

        let record = apply_leave(&mut store, &policy, new_leave(EMAIL, "2025-02-01", "2025-02-01"))
            .await
            .unwrap();

        assert_eq!(record.employee_email, EMAIL);
        assert_eq!(record.span_days(), 1);
        assert_eq!(store.leaves.len(), 1);
    }

    #[actix_web::test]
    async fn apply_for_unknown_employee_is_not_found() {
        let mut store = MemStore::default();
        let policy = LeavePolicy::default();

        let err = apply_leave(
            &mut store,
            &policy,
            new_leave("nonexistent@x.com", "2025-02-01", "2025-02-01"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ServiceError::NotFound("Employee")));
        assert!(store.leaves.is_empty());
    }

    #[actix_web::test]
    async fn second_apply_in_same_month_hits_monthly_cap() {
        let mut store = MemStore::with_employee(EMAIL);
        let policy = LeavePolicy::default();

        apply_leave(&mut store, &policy, new_leave(EMAIL, "2025-02-01", "2025-02-01"))
            .await
            .unwrap();
        let err = apply_leave(&mut store, &policy, new_leave(EMAIL, "2025-02-15", "2025-02-15"))
            .await
            .unwrap_err();

        match err {
            ServiceError::Validation(msg) => assert!(msg.contains("Monthly leave limit")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[actix_web::test]
    async fn same_day_apply_reports_overlap_not_monthly_cap() {
        let mut store = MemStore::with_employee(EMAIL);
        let policy = LeavePolicy::default();
        store.seed(EMAIL, "2025-03-10", "2025-03-10");

        let err = apply_leave(&mut store, &policy, new_leave(EMAIL, "2025-03-10", "2025-03-10"))
            .await
            .unwrap_err();

        match err {
            ServiceError::Validation(msg) => assert!(msg.contains("overlap")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[actix_web::test]
    async fn apply_is_rejected_once_yearly_quota_is_spent() {
        let mut store = MemStore::with_employee(EMAIL);
        let policy = LeavePolicy::default();
        // Historic 12-day record, booked before the one-day policy.
        store.seed(EMAIL, "2025-02-01", "2025-02-12");

        let err = apply_leave(&mut store, &policy, new_leave(EMAIL, "2025-01-15", "2025-01-15"))
            .await
            .unwrap_err();

        match err {
            ServiceError::Validation(msg) => assert!(msg.contains("Yearly leave limit")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[actix_web::test]
    async fn update_merges_only_present_fields() {
        let mut store = MemStore::with_employee(EMAIL);
        let policy = LeavePolicy::default();
        let id = store.seed(EMAIL, "2025-02-01", "2025-02-01");

        let patch = LeavePatch {
            reason: None,
            start_date: Some(date("2025-02-20")),
            end_date: Some(date("2025-02-20")),
        };
        let updated = update_leave(&mut store, &policy, date("2025-06-15"), id, patch)
            .await
            .unwrap();

        assert_eq!(updated.reason, "Family event");
        assert_eq!(updated.start_date, date("2025-02-20"));
        assert_eq!(updated.end_date, date("2025-02-20"));
    }

    #[actix_web::test]
    async fn update_excludes_itself_from_revalidation() {
        // Moving the only February record inside February must not trip the
        // monthly cap against its own old dates.
        let mut store = MemStore::with_employee(EMAIL);
        let policy = LeavePolicy::default();
        let id = store.seed(EMAIL, "2025-02-01", "2025-02-01");
        store.seed(EMAIL, "2025-03-05", "2025-03-05");

        let patch = LeavePatch {
            start_date: Some(date("2025-02-10")),
            end_date: Some(date("2025-02-10")),
            ..Default::default()
        };
        assert!(
            update_leave(&mut store, &policy, date("2025-06-15"), id, patch)
                .await
                .is_ok()
        );
    }

    #[actix_web::test]
    async fn update_into_an_occupied_month_is_rejected() {
        let mut store = MemStore::with_employee(EMAIL);
        let policy = LeavePolicy::default();
        let id = store.seed(EMAIL, "2025-02-01", "2025-02-01");
        store.seed(EMAIL, "2025-03-05", "2025-03-05");

        let patch = LeavePatch {
            start_date: Some(date("2025-03-20")),
            end_date: Some(date("2025-03-20")),
            ..Default::default()
        };
        let err = update_leave(&mut store, &policy, date("2025-06-15"), id, patch)
            .await
            .unwrap_err();

        match err {
            ServiceError::Validation(msg) => assert!(msg.contains("Monthly leave limit")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[actix_web::test]
    async fn ongoing_record_cannot_be_updated() {
        let mut store = MemStore::with_employee(EMAIL);
        let policy = LeavePolicy::default();
        let today = date("2025-02-01");
        let id = store.seed(EMAIL, "2025-02-01", "2025-02-01");

        let patch = LeavePatch {
            reason: Some("Changed my mind".into()),
            ..Default::default()
        };
        let err = update_leave(&mut store, &policy, today, id, patch)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::OngoingImmutable("updated")));
    }

    #[actix_web::test]
    async fn update_of_missing_record_is_not_found() {
        let mut store = MemStore::with_employee(EMAIL);
        let policy = LeavePolicy::default();

        let err = update_leave(
            &mut store,
            &policy,
            date("2025-06-15"),
            99,
            LeavePatch::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ServiceError::NotFound("Leave request")));
    }

    #[actix_web::test]
    async fn delete_removes_a_past_record() {
        let mut store = MemStore::with_employee(EMAIL);
        let id = store.seed(EMAIL, "2025-02-01", "2025-02-01");

        delete_leave(&mut store, date("2025-06-15"), id).await.unwrap();

        assert!(store.leaves.is_empty());
    }

    #[actix_web::test]
    async fn ongoing_record_cannot_be_deleted() {
        let mut store = MemStore::with_employee(EMAIL);
        let today = date("2025-02-01");
        let id = store.seed(EMAIL, "2025-02-01", "2025-02-01");

        let err = delete_leave(&mut store, today, id).await.unwrap_err();

        assert!(matches!(err, ServiceError::OngoingImmutable("deleted")));
        assert_eq!(store.leaves.len(), 1);
    }

    #[actix_web::test]
    async fn listing_orders_by_start_date_descending() {
        let mut store = MemStore::with_employee(EMAIL);
        store.seed(EMAIL, "2025-01-05", "2025-01-05");
        store.seed(EMAIL, "2025-06-20", "2025-06-20");
        store.seed(EMAIL, "2025-03-12", "2025-03-12");

        let leaves = list_for_employee(&mut store, EMAIL).await.unwrap();

        let starts: Vec<NaiveDate> = leaves.iter().map(|l| l.start_date).collect();
        assert_eq!(
            starts,
            vec![date("2025-06-20"), date("2025-03-12"), date("2025-01-05")]
        );
    }

    #[actix_web::test]
    async fn listing_unknown_employee_is_not_found() {
        let mut store = MemStore::with_employee(EMAIL);

        let err = list_for_employee(&mut store, "nonexistent@x.com")
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::NotFound("Employee")));
    }

    #[actix_web::test]
    async fn listing_without_records_is_an_empty_success() {
        let mut store = MemStore::with_employee(EMAIL);

        let leaves = list_for_employee(&mut store, EMAIL).await.unwrap();

        assert!(leaves.is_empty());
    }

    #[actix_web::test]
    async fn list_all_pages_keep_the_global_order() {
        let mut store = MemStore::with_employee(EMAIL);
        store.seed(EMAIL, "2025-01-05", "2025-01-05");
        store.seed(EMAIL, "2025-06-20", "2025-06-20");
        store.seed(EMAIL, "2025-03-12", "2025-03-12");

        let (first, total) = list_all(&mut store, 1, 2).await.unwrap();
        let (second, _) = list_all(&mut store, 2, 2).await.unwrap();

        assert_eq!(total, 3);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].start_date, date("2025-06-20"));
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].start_date, date("2025-01-05"));
    }
}
