//! In-process user and appointment store, used when no database is configured
//! and by the test suites.

use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    appointments::{
        repo::AppointmentStore,
        repo_types::{Appointment, NewAppointment},
    },
    auth::{repo::UserStore, repo_types::User},
};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>, // username -> user
    appointments: RwLock<Vec<Appointment>>, // insertion order
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_by_date(mut rows: Vec<Appointment>) -> Vec<Appointment> {
    rows.sort_by_key(|a| a.date); // stable, ties keep insertion order
    rows
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, username: &str, password_hash: &str) -> anyhow::Result<Option<User>> {
        let mut users = self.users.write().await;
        if users.contains_key(username) {
            return Ok(None);
        }
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        users.insert(user.username.clone(), user.clone());
        Ok(Some(user))
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        Ok(self.users.read().await.get(username).cloned())
    }
}

#[async_trait]
impl AppointmentStore for MemoryStore {
    async fn insert(
        &self,
        owner: &str,
        id: &str,
        fields: &NewAppointment,
    ) -> anyhow::Result<Appointment> {
        let mut rows = self.appointments.write().await;
        if rows.iter().any(|a| a.id == id && a.owner_username == owner) {
            anyhow::bail!("duplicate appointment id {id} for {owner}");
        }
        let appointment = Appointment {
            row_id: Uuid::new_v4(),
            id: id.to_string(),
            owner_username: owner.to_string(),
            name: fields.name.clone(),
            date: fields.date,
            address: fields.address.clone(),
            towncity: fields.towncity.clone(),
            postcode: fields.postcode.clone(),
        };
        rows.push(appointment.clone());
        Ok(appointment)
    }

    async fn list_by_owner(&self, owner: &str) -> anyhow::Result<Vec<Appointment>> {
        let rows = self.appointments.read().await;
        Ok(sorted_by_date(
            rows.iter().filter(|a| a.owner_username == owner).cloned().collect(),
        ))
    }

    async fn find_by_id(&self, id: &str, owner: &str) -> anyhow::Result<Option<Appointment>> {
        let rows = self.appointments.read().await;
        Ok(rows
            .iter()
            .find(|a| a.id == id && a.owner_username == owner)
            .cloned())
    }

    async fn list_between(
        &self,
        owner: &str,
        low: OffsetDateTime,
        high: OffsetDateTime,
    ) -> anyhow::Result<Vec<Appointment>> {
        let rows = self.appointments.read().await;
        Ok(sorted_by_date(
            rows.iter()
                .filter(|a| a.owner_username == owner && a.date >= low && a.date < high)
                .cloned()
                .collect(),
        ))
    }

    async fn update(
        &self,
        id: &str,
        owner: &str,
        fields: &NewAppointment,
    ) -> anyhow::Result<Option<Appointment>> {
        let mut rows = self.appointments.write().await;
        let Some(row) = rows
            .iter_mut()
            .find(|a| a.id == id && a.owner_username == owner)
        else {
            return Ok(None);
        };
        row.name = fields.name.clone();
        row.date = fields.date;
        row.address = fields.address.clone();
        row.towncity = fields.towncity.clone();
        row.postcode = fields.postcode.clone();
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: &str, owner: &str) -> anyhow::Result<bool> {
        let mut rows = self.appointments.write().await;
        let before = rows.len();
        rows.retain(|a| !(a.id == id && a.owner_username == owner));
        Ok(rows.len() < before)
    }

    async fn delete_all(&self, owner: &str) -> anyhow::Result<u64> {
        let mut rows = self.appointments.write().await;
        let before = rows.len();
        rows.retain(|a| a.owner_username != owner);
        Ok((before - rows.len()) as u64)
    }

    async fn count(&self, owner: &str) -> anyhow::Result<i64> {
        let rows = self.appointments.read().await;
        Ok(rows.iter().filter(|a| a.owner_username == owner).count() as i64)
    }
}
