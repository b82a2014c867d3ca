use tracing::debug;

use super::{
    directions::{DirectionsGateway, Step},
    events::{Event, EventsGateway},
};
use crate::{
    appointments::{repo::AppointmentStore, repo_types::Appointment, services::get_by_id},
    error::AppResult,
};

/// Destination string handed to the directions upstream.
pub fn destination(appointment: &Appointment) -> String {
    format!(
        "{}, {}, {}",
        appointment.address, appointment.towncity, appointment.postcode
    )
}

pub async fn get_directions(
    store: &dyn AppointmentStore,
    gateway: &dyn DirectionsGateway,
    id: &str,
    owner: &str,
    origin: &str,
) -> AppResult<Vec<Step>> {
    let appointment = get_by_id(store, id, owner).await?;
    debug!(id, origin, "fetching directions");
    Ok(gateway.route(origin, &destination(&appointment)).await?)
}

/// Meters from `origin` to the appointment.
pub async fn get_distance(
    store: &dyn AppointmentStore,
    gateway: &dyn DirectionsGateway,
    id: &str,
    owner: &str,
    origin: &str,
) -> AppResult<i64> {
    let appointment = get_by_id(store, id, owner).await?;
    Ok(gateway.distance(origin, &destination(&appointment)).await?)
}

/// Seconds of travel from `origin` to the appointment.
pub async fn get_duration(
    store: &dyn AppointmentStore,
    gateway: &dyn DirectionsGateway,
    id: &str,
    owner: &str,
    origin: &str,
) -> AppResult<i64> {
    let appointment = get_by_id(store, id, owner).await?;
    Ok(gateway.duration(origin, &destination(&appointment)).await?)
}

pub async fn get_events(
    store: &dyn AppointmentStore,
    gateway: &dyn EventsGateway,
    id: &str,
    owner: &str,
) -> AppResult<Vec<Event>> {
    let appointment = get_by_id(store, id, owner).await?;
    debug!(id, town = %appointment.towncity, "fetching events");
    Ok(gateway
        .events_for(&appointment.towncity, appointment.date)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        appointments::services::create,
        enrichment::{directions::Leg, directions::TextValue, GatewayError},
        error::AppError,
        memory::MemoryStore,
    };
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use time::{OffsetDateTime, UtcOffset};

    #[derive(Default)]
    struct RecordingDirections {
        calls: AtomicUsize,
        last: Mutex<Option<(String, String)>>,
    }

    #[async_trait]
    impl DirectionsGateway for RecordingDirections {
        async fn leg(&self, origin: &str, destination: &str) -> Result<Leg, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some((origin.to_string(), destination.to_string()));
            Ok(Leg {
                distance: TextValue { text: "3 km".into(), value: 3000 },
                duration: TextValue { text: "6 mins".into(), value: 360 },
                steps: vec![],
            })
        }
    }

    struct UnknownTown;

    #[async_trait]
    impl EventsGateway for UnknownTown {
        async fn events_for(&self, town: &str, _date: OffsetDateTime) -> Result<Vec<Event>, GatewayError> {
            Err(GatewayError::InvalidArgument(format!("location.address {town} - INVALID")))
        }
    }

    async fn seeded() -> (MemoryStore, Appointment) {
        let store = MemoryStore::new();
        let appointment = create(
            &store,
            &json!({
                "name": "New Appointment",
                "date": "2016-11-16 10:00",
                "address": "The Lea",
                "towncity": "Loughborough",
                "postcode": "LE126TD"
            }),
            "jwolfe94",
            UtcOffset::UTC,
        )
        .await
        .unwrap();
        (store, appointment)
    }

    #[tokio::test]
    async fn builds_destination_from_address_fields() {
        let (store, appointment) = seeded().await;
        let gateway = RecordingDirections::default();

        let meters = get_distance(&store, &gateway, &appointment.id, "jwolfe94", "52.7, -1.2")
            .await
            .unwrap();
        assert_eq!(meters, 3000);

        let last = gateway.last.lock().unwrap().clone().unwrap();
        assert_eq!(last.0, "52.7, -1.2");
        assert_eq!(last.1, "The Lea, Loughborough, LE126TD");
    }

    #[tokio::test]
    async fn missing_appointment_preempts_gateway() {
        let (store, appointment) = seeded().await;
        let gateway = RecordingDirections::default();

        let err = get_directions(&store, &gateway, &appointment.id, "intruder", "0,0")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = get_duration(&store, &gateway, "nope", "jwolfe94", "0,0")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn upstream_invalid_argument_surfaces() {
        let (store, appointment) = seeded().await;
        let err = get_events(&store, &UnknownTown, &appointment.id, "jwolfe94")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UpstreamInvalidArgument(ref m) if m.contains("Loughborough")));
    }
}
