use crate::api::leave::{CreateLeave, LeaveListResponse, UpdateLeave};
use crate::model::employee::Employee;
use crate::model::leave_request::LeaveRequest;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cuti Service API",
        version = "1.0.0",
        description = r#"
## Employee Leave ("Cuti") Management

This API manages employee leave requests against organizational quotas.

### 🔹 Key Features
- **Apply for leave** — validated against range, span, overlap, and
  monthly/yearly quota rules
- **Update / delete leave** — blocked while a record is ongoing
- **Leave history** — per-employee listing and global pagination

### 📦 Response Format
- JSON responses in a `{status, message?, data?}` envelope
- Pagination supported for the global list endpoint

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave::apply_leave,
        crate::api::leave::update_leave,
        crate::api::leave::delete_leave,
        crate::api::leave::list_for_employee,
        crate::api::leave::list_leaves,
    ),
    components(
        schemas(
            CreateLeave,
            UpdateLeave,
            LeaveListResponse,
            LeaveRequest,
            Employee,
        )
    ),
    tags(
        (name = "Cuti", description = "Leave management APIs"),
    )
)]
pub struct ApiDoc;
