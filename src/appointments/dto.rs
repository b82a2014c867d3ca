use serde::Serialize;
use serde_json::Value;
use time::UtcOffset;

use super::{dates::parse_date, repo_types::{Appointment, NewAppointment}};
use crate::{
    error::{AppError, AppResult},
    validation::string_field,
};

/// Appointment fields exactly as received, after the string-type check.
#[derive(Debug)]
pub struct AppointmentPayload {
    pub name: String,
    pub date: String,
    pub address: String,
    pub towncity: String,
    pub postcode: String,
}

impl TryFrom<&Value> for AppointmentPayload {
    type Error = AppError;

    fn try_from(body: &Value) -> Result<Self, Self::Error> {
        let field = |name: &str| {
            string_field(body, name)
                .ok_or_else(|| AppError::invalid_input(format!("{name} is not a string")))
        };
        Ok(Self {
            name: field("name")?,
            date: field("date")?,
            address: field("address")?,
            towncity: field("towncity")?,
            postcode: field("postcode")?,
        })
    }
}

impl AppointmentPayload {
    /// Parses the date; only called once every field is known to be a string.
    pub fn into_new(self, offset: UtcOffset) -> AppResult<NewAppointment> {
        Ok(NewAppointment {
            date: parse_date(&self.date, offset)?,
            name: self.name,
            address: self.address,
            towncity: self.towncity,
            postcode: self.postcode,
        })
    }
}

pub fn parse_payload(body: &Value, offset: UtcOffset) -> AppResult<NewAppointment> {
    AppointmentPayload::try_from(body)?.into_new(offset)
}

#[derive(Debug, Serialize)]
pub struct CreatedAppointmentResponse {
    pub appointment: Appointment,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub response: String,
}

#[derive(Debug, Serialize)]
pub struct UpdatedResponse {
    pub response: String,
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct ClearedResponse {
    pub response: String,
    pub removed: u64,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: i64,
}

/// Either a single appointment (id lookup) or a day's list (date lookup).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum LookupResponse {
    One(Appointment),
    Many(Vec<Appointment>),
}
