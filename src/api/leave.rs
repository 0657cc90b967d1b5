use actix_web::{HttpResponse, web};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::config::Config;
use crate::error::ServiceError;
use crate::model::leave_request::LeaveRequest;
use crate::service::leave::{self as leave_service, LeavePatch};
use crate::store::NewLeave;

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = "rina@gmail.com", format = "email", value_type = String)]
    pub employee_email: String,
    #[schema(example = "Family event")]
    pub reason: String,
    #[schema(example = "2025-02-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2025-02-01", format = "date", value_type = String)]
    pub end_date: NaiveDate,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateLeave {
    #[schema(example = "Family event")]
    pub reason: Option<String>,
    #[schema(example = "2025-02-01", format = "date", value_type = String)]
    pub start_date: Option<NaiveDate>,
    #[schema(example = "2025-02-01", format = "date", value_type = String)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Deserialize, IntoParams)]
pub struct LeavePageQuery {
    /// Pagination page number, 1-based
    pub page: Option<u64>,
    /// Items per page
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
#[schema(example = json!({
    "status": "success",
    "data": [
        {
            "id": 1,
            "employee_email": "rina@gmail.com",
            "reason": "Family event",
            "start_date": "2025-01-05",
            "end_date": "2025-01-05",
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z"
        }
    ],
    "page": 1,
    "per_page": 10,
    "total": 1
}))]
pub struct LeaveListResponse {
    #[schema(example = "success")]
    pub status: String,
    pub data: Vec<LeaveRequest>,
    #[schema(example = 1)]
    pub page: u64,
    #[schema(example = 10)]
    pub per_page: u64,
    #[schema(example = 1)]
    pub total: i64,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/* =========================
Apply for leave
========================= */
#[utoipa::path(
    post,
    path = "/api/cuti",
    request_body(
        content = CreateLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request created", body = Object, example = json!({
            "status": "success",
            "message": "Leave request created",
            "data": {
                "id": 1,
                "employee_email": "rina@gmail.com",
                "reason": "Family event",
                "start_date": "2025-02-01",
                "end_date": "2025-02-01",
                "created_at": "2025-01-01T00:00:00Z",
                "updated_at": "2025-01-01T00:00:00Z"
            }
        })),
        (status = 400, description = "Leave rule violation", body = Object, example = json!({
            "status": "error",
            "message": "Maximum of 1 day(s) leave per request"
        })),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Cuti"
)]
pub async fn apply_leave(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<CreateLeave>,
) -> Result<HttpResponse, ServiceError> {
    let payload = payload.into_inner();
    if payload.reason.trim().is_empty() {
        return Err(ServiceError::Validation("Reason for leave is required".into()));
    }

    let input = NewLeave {
        employee_email: payload.employee_email,
        reason: payload.reason,
        start_date: payload.start_date,
        end_date: payload.end_date,
    };

    let mut tx = pool.begin().await.map_err(ServiceError::from)?;
    match leave_service::apply_leave(&mut *tx, &config.leave_policy, input).await {
        Ok(record) => {
            tx.commit().await.map_err(ServiceError::from)?;
            Ok(HttpResponse::Created().json(json!({
                "status": "success",
                "message": "Leave request created",
                "data": record,
            })))
        }
        Err(err) => {
            let _ = tx.rollback().await;
            Err(err)
        }
    }
}

/* =========================
Update a leave record
========================= */
#[utoipa::path(
    patch,
    path = "/api/cuti/{id}",
    params(
        ("id" = u64, Path, description = "ID of the leave record to update")
    ),
    request_body = UpdateLeave,
    responses(
        (status = 200, description = "Leave record updated", body = Object, example = json!({
            "status": "success",
            "message": "Leave request updated",
        })),
        (status = 400, description = "Rule violation or ongoing record", body = Object, example = json!({
            "status": "error",
            "message": "Ongoing leave records cannot be updated"
        })),
        (status = 404, description = "Leave record not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Cuti"
)]
pub async fn update_leave(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<u64>,
    payload: web::Json<UpdateLeave>,
) -> Result<HttpResponse, ServiceError> {
    let id = path.into_inner();
    let payload = payload.into_inner();

    if matches!(&payload.reason, Some(reason) if reason.trim().is_empty()) {
        return Err(ServiceError::Validation("Reason for leave is required".into()));
    }

    let patch = LeavePatch {
        reason: payload.reason,
        start_date: payload.start_date,
        end_date: payload.end_date,
    };

    let mut tx = pool.begin().await.map_err(ServiceError::from)?;
    match leave_service::update_leave(&mut *tx, &config.leave_policy, today(), id, patch).await {
        Ok(record) => {
            tx.commit().await.map_err(ServiceError::from)?;
            Ok(HttpResponse::Ok().json(json!({
                "status": "success",
                "message": "Leave request updated",
                "data": record,
            })))
        }
        Err(err) => {
            let _ = tx.rollback().await;
            Err(err)
        }
    }
}

/* =========================
Delete a leave record
========================= */
#[utoipa::path(
    delete,
    path = "/api/cuti/{id}",
    params(
        ("id" = u64, Path, description = "ID of the leave record to delete")
    ),
    responses(
        (status = 200, description = "Leave record deleted", body = Object, example = json!({
            "status": "success",
            "message": "Leave request deleted"
        })),
        (status = 400, description = "Ongoing record", body = Object, example = json!({
            "status": "error",
            "message": "Ongoing leave records cannot be deleted"
        })),
        (status = 404, description = "Leave record not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Cuti"
)]
pub async fn delete_leave(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ServiceError> {
    let id = path.into_inner();

    let mut tx = pool.begin().await.map_err(ServiceError::from)?;
    match leave_service::delete_leave(&mut *tx, today(), id).await {
        Ok(()) => {
            tx.commit().await.map_err(ServiceError::from)?;
            Ok(HttpResponse::Ok().json(json!({
                "status": "success",
                "message": "Leave request deleted",
            })))
        }
        Err(err) => {
            let _ = tx.rollback().await;
            Err(err)
        }
    }
}

/* =========================
List leave records of one employee
========================= */
#[utoipa::path(
    get,
    path = "/api/cuti/{email}",
    params(
        ("email" = String, Path, description = "Employee email")
    ),
    responses(
        (status = 200, description = "Leave records for the employee", body = Object, example = json!({
            "status": "success",
            "data": []
        })),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Cuti"
)]
pub async fn list_for_employee(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let email = path.into_inner();

    let mut conn = pool.acquire().await.map_err(ServiceError::from)?;
    let leaves = leave_service::list_for_employee(&mut *conn, &email).await?;

    // An employee without records is a normal outcome, distinct from an
    // unknown employee (404 above).
    if leaves.is_empty() {
        return Ok(HttpResponse::Ok().json(json!({
            "status": "success",
            "message": "No leave data found for this employee",
            "data": [],
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "data": leaves,
    })))
}

/* =========================
List all leave records
========================= */
#[utoipa::path(
    get,
    path = "/api/cuti",
    params(LeavePageQuery),
    responses(
        (status = 200, description = "Paginated leave list", body = LeaveListResponse),
        (status = 400, description = "Invalid pagination parameters"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Cuti"
)]
pub async fn list_leaves(
    pool: web::Data<MySqlPool>,
    query: web::Query<LeavePageQuery>,
) -> Result<HttpResponse, ServiceError> {
    let page = query.page.unwrap_or(1);
    let per_page = query.per_page.unwrap_or(10);
    if page == 0 || per_page == 0 {
        return Err(ServiceError::Validation(
            "page and per_page must be positive integers".into(),
        ));
    }

    let mut conn = pool.acquire().await.map_err(ServiceError::from)?;
    let (leaves, total) = leave_service::list_all(&mut *conn, page, per_page).await?;

    Ok(HttpResponse::Ok().json(LeaveListResponse {
        status: "success".to_string(),
        data: leaves,
        page,
        per_page,
        total,
    }))
}
