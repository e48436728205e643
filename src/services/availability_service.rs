//! Availability Checker
//!
//! Decide si un coche está libre para un rango de fechas y resuelve la
//! consulta de flota por ubicación con un fan-out concurrente de solo
//! lectura. El chequeo autoritativo se repite siempre al crear la reserva.

use chrono::NaiveDate;
use futures::future::join_all;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::car::Car;
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::car_repository::CarRepository;
use crate::utils::errors::AppResult;

/// Predicado de solapamiento con bordes inclusivos: [p1,r1] y [p2,r2]
/// chocan si p1 <= r2 y p2 <= r1. Tocar un borde cuenta como conflicto.
pub fn dates_overlap(p1: NaiveDate, r1: NaiveDate, p2: NaiveDate, r2: NaiveDate) -> bool {
    p1 <= r2 && p2 <= r1
}

pub struct AvailabilityService {
    bookings: BookingRepository,
    cars: CarRepository,
}

impl AvailabilityService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            bookings: BookingRepository::new(pool.clone()),
            cars: CarRepository::new(pool),
        }
    }

    /// `true` si ninguna reserva no cancelada del coche solapa el rango.
    pub async fn is_available(
        &self,
        car_id: Uuid,
        pickup_date: NaiveDate,
        return_date: NaiveDate,
    ) -> AppResult<bool> {
        let overlapping = self
            .bookings
            .exists_overlapping(car_id, pickup_date, return_date)
            .await?;
        Ok(!overlapping)
    }

    /// Flota disponible en una ubicación para un rango: se filtran los
    /// candidatos por ubicación y se chequea cada uno concurrentemente.
    /// Lectura sin locks; sirve para informar al usuario, no para reservar.
    pub async fn list_available_cars(
        &self,
        location: &str,
        pickup_date: NaiveDate,
        return_date: NaiveDate,
    ) -> AppResult<Vec<Car>> {
        let candidates = self.cars.find_listed_by_location(location).await?;

        let checks = candidates
            .iter()
            .map(|car| self.is_available(car.id, pickup_date, return_date));
        let results = join_all(checks).await;

        let mut available = Vec::with_capacity(candidates.len());
        for (car, result) in candidates.into_iter().zip(results) {
            if result? {
                available.push(car);
            }
        }

        Ok(available)
    }
}
