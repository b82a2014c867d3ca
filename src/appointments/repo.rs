use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{Appointment, NewAppointment};

/// Owner-scoped appointment persistence. Every method filters on `owner`.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn insert(&self, owner: &str, id: &str, fields: &NewAppointment)
        -> anyhow::Result<Appointment>;

    /// All of the owner's appointments ordered by date.
    async fn list_by_owner(&self, owner: &str) -> anyhow::Result<Vec<Appointment>>;

    async fn find_by_id(&self, id: &str, owner: &str) -> anyhow::Result<Option<Appointment>>;

    /// Appointments with `low <= date < high`.
    async fn list_between(
        &self,
        owner: &str,
        low: OffsetDateTime,
        high: OffsetDateTime,
    ) -> anyhow::Result<Vec<Appointment>>;

    /// Rewrites every field; `None` when no (id, owner) row exists.
    async fn update(
        &self,
        id: &str,
        owner: &str,
        fields: &NewAppointment,
    ) -> anyhow::Result<Option<Appointment>>;

    /// `false` when nothing matched.
    async fn delete(&self, id: &str, owner: &str) -> anyhow::Result<bool>;

    /// Number of rows removed.
    async fn delete_all(&self, owner: &str) -> anyhow::Result<u64>;

    async fn count(&self, owner: &str) -> anyhow::Result<i64>;
}

#[derive(Clone)]
pub struct PgAppointmentStore {
    db: PgPool,
}

impl PgAppointmentStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AppointmentStore for PgAppointmentStore {
    async fn insert(
        &self,
        owner: &str,
        id: &str,
        fields: &NewAppointment,
    ) -> anyhow::Result<Appointment> {
        let row = sqlx::query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments (row_id, id, owner_username, name, date, address, towncity, postcode)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING row_id, id, owner_username, name, date, address, towncity, postcode
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(id)
        .bind(owner)
        .bind(&fields.name)
        .bind(fields.date)
        .bind(&fields.address)
        .bind(&fields.towncity)
        .bind(&fields.postcode)
        .fetch_one(&self.db)
        .await
        .context("insert appointment")?;
        Ok(row)
    }

    async fn list_by_owner(&self, owner: &str) -> anyhow::Result<Vec<Appointment>> {
        let rows = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT row_id, id, owner_username, name, date, address, towncity, postcode
            FROM appointments
            WHERE owner_username = $1
            ORDER BY date ASC, created_at ASC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.db)
        .await
        .context("list appointments by owner")?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: &str, owner: &str) -> anyhow::Result<Option<Appointment>> {
        let row = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT row_id, id, owner_username, name, date, address, towncity, postcode
            FROM appointments
            WHERE id = $1 AND owner_username = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await
        .context("find appointment by id")?;
        Ok(row)
    }

    async fn list_between(
        &self,
        owner: &str,
        low: OffsetDateTime,
        high: OffsetDateTime,
    ) -> anyhow::Result<Vec<Appointment>> {
        let rows = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT row_id, id, owner_username, name, date, address, towncity, postcode
            FROM appointments
            WHERE owner_username = $1 AND date >= $2 AND date < $3
            ORDER BY date ASC, created_at ASC
            "#,
        )
        .bind(owner)
        .bind(low)
        .bind(high)
        .fetch_all(&self.db)
        .await
        .context("list appointments in range")?;
        Ok(rows)
    }

    async fn update(
        &self,
        id: &str,
        owner: &str,
        fields: &NewAppointment,
    ) -> anyhow::Result<Option<Appointment>> {
        let row = sqlx::query_as::<_, Appointment>(
            r#"
            UPDATE appointments
               SET name = $3, date = $4, address = $5, towncity = $6, postcode = $7
             WHERE id = $1 AND owner_username = $2
            RETURNING row_id, id, owner_username, name, date, address, towncity, postcode
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(&fields.name)
        .bind(fields.date)
        .bind(&fields.address)
        .bind(&fields.towncity)
        .bind(&fields.postcode)
        .fetch_optional(&self.db)
        .await
        .context("update appointment")?;
        Ok(row)
    }

    async fn delete(&self, id: &str, owner: &str) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1 AND owner_username = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.db)
            .await
            .context("delete appointment")?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self, owner: &str) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM appointments WHERE owner_username = $1")
            .bind(owner)
            .execute(&self.db)
            .await
            .context("clear appointments")?;
        Ok(result.rows_affected())
    }

    async fn count(&self, owner: &str) -> anyhow::Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM appointments WHERE owner_username = $1")
                .bind(owner)
                .fetch_one(&self.db)
                .await
                .context("count appointments")?;
        Ok(count)
    }
}
