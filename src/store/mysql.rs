use chrono::NaiveDate;
use sqlx::MySqlConnection;

use crate::error::ServiceError;
use crate::model::{employee::Employee, leave_request::LeaveRequest};
use crate::store::{EmployeeDirectory, LeaveStore, NewLeave};

// Both contracts are implemented directly on the connection, so a
// `Transaction<'_, MySql>` handed to the orchestrator (via DerefMut)
// scopes every call below to that transaction.

impl EmployeeDirectory for MySqlConnection {
    async fn find_employee(&mut self, email: &str) -> Result<Option<Employee>, ServiceError> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT email, first_name, last_name, phone, address, gender, created_at, updated_at
            FROM employees
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&mut *self)
        .await?;

        Ok(employee)
    }
}

impl LeaveStore for MySqlConnection {
    async fn find_by_id(&mut self, id: u64) -> Result<Option<LeaveRequest>, ServiceError> {
        let leave = sqlx::query_as::<_, LeaveRequest>(
            r#"
            SELECT id, employee_email, reason, start_date, end_date, created_at, updated_at
            FROM leave_requests
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self)
        .await?;

        Ok(leave)
    }

    async fn find_in_range(
        &mut self,
        employee_email: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<LeaveRequest>, ServiceError> {
        // FOR UPDATE serializes concurrent apply/update calls for the same
        // employee on this row range, re-verifying the overlap/cap checks
        // at commit time as the isolation model requires.
        let leaves = sqlx::query_as::<_, LeaveRequest>(
            r#"
            SELECT id, employee_email, reason, start_date, end_date, created_at, updated_at
            FROM leave_requests
            WHERE employee_email = ? AND start_date <= ? AND end_date >= ?
            FOR UPDATE
            "#,
        )
        .bind(employee_email)
        .bind(to)
        .bind(from)
        .fetch_all(&mut *self)
        .await?;

        Ok(leaves)
    }

    async fn insert(&mut self, leave: &NewLeave) -> Result<LeaveRequest, ServiceError> {
        let result = sqlx::query(
            r#"
            INSERT INTO leave_requests (employee_email, reason, start_date, end_date)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&leave.employee_email)
        .bind(&leave.reason)
        .bind(leave.start_date)
        .bind(leave.end_date)
        .execute(&mut *self)
        .await?;

        let id = result.last_insert_id();

        // Re-read to pick up the store-assigned id and timestamps.
        let created = sqlx::query_as::<_, LeaveRequest>(
            r#"
            SELECT id, employee_email, reason, start_date, end_date, created_at, updated_at
            FROM leave_requests
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_one(&mut *self)
        .await?;

        Ok(created)
    }

    async fn update(&mut self, leave: &LeaveRequest) -> Result<LeaveRequest, ServiceError> {
        sqlx::query(
            r#"
            UPDATE leave_requests
            SET reason = ?, start_date = ?, end_date = ?
            WHERE id = ?
            "#,
        )
        .bind(&leave.reason)
        .bind(leave.start_date)
        .bind(leave.end_date)
        .bind(leave.id)
        .execute(&mut *self)
        .await?;

        let updated = sqlx::query_as::<_, LeaveRequest>(
            r#"
            SELECT id, employee_email, reason, start_date, end_date, created_at, updated_at
            FROM leave_requests
            WHERE id = ?
            "#,
        )
        .bind(leave.id)
        .fetch_one(&mut *self)
        .await?;

        Ok(updated)
    }

    async fn delete(&mut self, id: u64) -> Result<(), ServiceError> {
        sqlx::query("DELETE FROM leave_requests WHERE id = ?")
            .bind(id)
            .execute(&mut *self)
            .await?;

        Ok(())
    }

    async fn list_for_employee(
        &mut self,
        employee_email: &str,
    ) -> Result<Vec<LeaveRequest>, ServiceError> {
        let leaves = sqlx::query_as::<_, LeaveRequest>(
            r#"
            SELECT id, employee_email, reason, start_date, end_date, created_at, updated_at
            FROM leave_requests
            WHERE employee_email = ?
            ORDER BY start_date DESC
            "#,
        )
        .bind(employee_email)
        .fetch_all(&mut *self)
        .await?;

        Ok(leaves)
    }

    async fn list_page(
        &mut self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<LeaveRequest>, i64), ServiceError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM leave_requests")
            .fetch_one(&mut *self)
            .await?;

        let offset = (page - 1) * per_page;
        let leaves = sqlx::query_as::<_, LeaveRequest>(
            r#"
            SELECT id, employee_email, reason, start_date, end_date, created_at, updated_at
            FROM leave_requests
            ORDER BY start_date DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(per_page as i64)
        .bind(offset as i64)
        .fetch_all(&mut *self)
        .await?;

        Ok((leaves, total))
    }
}
