use chrono::NaiveDate;

use crate::error::ServiceError;
use crate::model::{employee::Employee, leave_request::LeaveRequest};

pub mod mysql;

/// Fields of a leave record before the store has assigned an id and
/// timestamps.
#[derive(Debug, Clone)]
pub struct NewLeave {
    pub employee_email: String,
    pub reason: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Read access to the externally-owned employee directory. The engine only
/// ever checks existence; directory CRUD lives elsewhere.
#[allow(async_fn_in_trait)]
pub trait EmployeeDirectory {
    async fn find_employee(&mut self, email: &str) -> Result<Option<Employee>, ServiceError>;
}

/// Persistence contract for leave records. Implementations are expected to
/// be transaction-scoped: the orchestrator runs each use case against one
/// handle whose whole read-validate-write sequence commits or rolls back
/// together.
#[allow(async_fn_in_trait)]
pub trait LeaveStore {
    async fn find_by_id(&mut self, id: u64) -> Result<Option<LeaveRequest>, ServiceError>;

    /// Records of one employee whose `[start_date, end_date]` interval
    /// intersects `[from, to]`. Used to feed the rule engine, so the
    /// implementation should lock the returned rows against concurrent
    /// writers for the rest of the transaction.
    async fn find_in_range(
        &mut self,
        employee_email: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<LeaveRequest>, ServiceError>;

    async fn insert(&mut self, leave: &NewLeave) -> Result<LeaveRequest, ServiceError>;

    async fn update(&mut self, leave: &LeaveRequest) -> Result<LeaveRequest, ServiceError>;

    async fn delete(&mut self, id: u64) -> Result<(), ServiceError>;

    /// All records for one employee, most recent `start_date` first.
    async fn list_for_employee(
        &mut self,
        employee_email: &str,
    ) -> Result<Vec<LeaveRequest>, ServiceError>;

    /// One page of all records ordered by `start_date` descending, plus the
    /// total count. `page` is 1-based.
    async fn list_page(
        &mut self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<LeaveRequest>, i64), ServiceError>;
}
