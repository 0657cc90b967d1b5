use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Employee directory record. The directory owns employee CRUD; the leave
/// engine only resolves records by email to check existence.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "email": "rina@gmail.com",
        "first_name": "Rina",
        "last_name": "Wati",
        "phone": "+6281234567890",
        "address": "Jl. Merdeka No. 1, Jakarta",
        "gender": "F",
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-01T00:00:00Z"
    })
)]
pub struct Employee {
    #[schema(example = "rina@gmail.com")]
    pub email: String,

    #[schema(example = "Rina")]
    pub first_name: String,

    #[schema(example = "Wati")]
    pub last_name: String,

    #[schema(example = "+6281234567890")]
    pub phone: String,

    #[schema(example = "Jl. Merdeka No. 1, Jakarta")]
    pub address: String,

    #[schema(example = "F")]
    pub gender: String,

    #[schema(example = "2025-01-01T00:00:00Z", value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,

    #[schema(example = "2025-01-01T00:00:00Z", value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
}
