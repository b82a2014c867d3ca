use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Appointment row. `id` is the public token; `row_id` never leaves the store.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Appointment {
    #[serde(skip_serializing)]
    pub row_id: Uuid,
    pub id: String,
    pub owner_username: String,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub address: String,
    pub towncity: String,
    pub postcode: String,
}

/// Validated field set used for both create and full-replacement update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub name: String,
    pub date: OffsetDateTime,
    pub address: String,
    pub towncity: String,
    pub postcode: String,
}
