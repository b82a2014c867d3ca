use serde_json::Value;
use time::UtcOffset;
use tracing::{debug, info};

use super::{
    dates::{day_bounds, parse_date},
    dto::parse_payload,
    repo::AppointmentStore,
    repo_types::Appointment,
    token::generate_id,
};
use crate::error::{AppError, AppResult};

/// Validates the payload and stores it under `owner` with a fresh id.
pub async fn create(
    store: &dyn AppointmentStore,
    body: &Value,
    owner: &str,
    offset: UtcOffset,
) -> AppResult<Appointment> {
    let fields = parse_payload(body, offset)?;
    let appointment = store.insert(owner, &generate_id(), &fields).await?;
    info!(owner, id = %appointment.id, "appointment created");
    Ok(appointment)
}

pub async fn get_all(store: &dyn AppointmentStore, owner: &str) -> AppResult<Vec<Appointment>> {
    Ok(store.list_by_owner(owner).await?)
}

pub async fn get_by_id(store: &dyn AppointmentStore, id: &str, owner: &str) -> AppResult<Appointment> {
    store
        .find_by_id(id, owner)
        .await?
        .ok_or_else(AppError::appointment_not_found)
}

/// Appointments on the calendar day containing `date`.
pub async fn get_by_date(
    store: &dyn AppointmentStore,
    date: &str,
    owner: &str,
    offset: UtcOffset,
) -> AppResult<Vec<Appointment>> {
    let (low, high) = day_bounds(parse_date(date, offset)?, offset)?;
    debug!(owner, %low, %high, "appointments by date");

    let found = store.list_between(owner, low, high).await?;
    if found.is_empty() {
        return Err(AppError::NoneFound(
            "no appointments on given date/time".into(),
        ));
    }
    Ok(found)
}

/// Full replacement. Field validation runs first and short-circuits, so an
/// invalid body never reaches the store even when the id is unknown.
pub async fn update(
    store: &dyn AppointmentStore,
    id: &str,
    body: &Value,
    owner: &str,
    offset: UtcOffset,
) -> AppResult<String> {
    let fields = parse_payload(body, offset)?;
    store
        .update(id, owner, &fields)
        .await?
        .ok_or_else(AppError::appointment_not_found)?;
    info!(owner, id, "appointment updated");
    Ok(format!("{id} has been updated"))
}

pub async fn remove(store: &dyn AppointmentStore, id: &str, owner: &str) -> AppResult<String> {
    if !store.delete(id, owner).await? {
        return Err(AppError::appointment_not_found());
    }
    info!(owner, id, "appointment deleted");
    Ok("appointment has been deleted".into())
}

/// Removes every appointment of `owner`; zero rows is still success.
pub async fn clear_all(store: &dyn AppointmentStore, owner: &str) -> AppResult<u64> {
    let removed = store.delete_all(owner).await?;
    info!(owner, removed, "appointments cleared");
    Ok(removed)
}

pub async fn count(store: &dyn AppointmentStore, owner: &str) -> AppResult<i64> {
    Ok(store.count(owner).await?)
}
