//! Modelo de Booking
//!
//! Este módulo contiene el struct Booking, el ciclo de vida del estado
//! (pending → confirmed/cancelled) y el cálculo de precio por días.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado de la reserva - mapea al ENUM booking_status
///
/// `cancelled` es terminal: una reserva cancelada nunca vuelve a activarse
/// y deja de bloquear el calendario del coche.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    /// Tabla de transiciones permitidas:
    /// pending → confirmed, pending → cancelled, confirmed → cancelled.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

/// Booking principal - mapea exactamente a la tabla bookings
///
/// `owner_id` es una copia del owner del coche en el momento de crear la
/// reserva; no sigue cambios posteriores del coche (el historial debe seguir
/// siendo atribuible aunque el coche se borre).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub car_id: Uuid,
    pub owner_id: Uuid,
    pub user_id: Uuid,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
    pub price: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// Número de días facturables de un rango [pickup, return].
///
/// Mínimo 1 día aunque pickup y return coincidan.
pub fn rental_days(pickup: NaiveDate, ret: NaiveDate) -> i64 {
    (ret - pickup).num_days().max(1)
}

/// Precio de la reserva: tarifa diaria × días facturables.
pub fn rental_price(price_per_day: Decimal, pickup: NaiveDate, ret: NaiveDate) -> Decimal {
    price_per_day * Decimal::from(rental_days(pickup, ret))
}

/// Request público para consultar disponibilidad de flota
#[derive(Debug, Deserialize)]
pub struct CheckAvailabilityRequest {
    pub location: String,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
}

/// Request para crear una reserva
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub car_id: Uuid,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
}

/// Request del owner para confirmar o cancelar una reserva
#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    pub booking_id: Uuid,
    pub status: BookingStatus,
}

/// Request del renter para cancelar su propia reserva
#[derive(Debug, Deserialize)]
pub struct CancelBookingRequest {
    pub booking_id: Uuid,
}

/// Resumen del renter para el listado del owner - nunca incluye el hash
#[derive(Debug, Serialize)]
pub struct RenterSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Response de reserva con su coche poblado
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub car: Option<crate::models::car::CarResponse>,
    pub owner_id: Uuid,
    pub user_id: Uuid,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
    pub price: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// Response de reserva para el owner, con coche y renter poblados
#[derive(Debug, Serialize)]
pub struct OwnerBookingResponse {
    pub id: Uuid,
    pub car: Option<crate::models::car::CarResponse>,
    pub renter: Option<RenterSummary>,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
    pub price: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn same_day_rental_charges_one_day() {
        let feb_1 = date(2024, 2, 1);
        assert_eq!(rental_days(feb_1, feb_1), 1);
        assert_eq!(
            rental_price(Decimal::new(1000, 0), feb_1, feb_1),
            Decimal::new(1000, 0)
        );
    }

    #[test]
    fn three_day_rental_price() {
        let pickup = date(2024, 2, 1);
        let ret = date(2024, 2, 4);
        assert_eq!(rental_days(pickup, ret), 3);
        assert_eq!(
            rental_price(Decimal::new(1000, 0), pickup, ret),
            Decimal::new(3000, 0)
        );
    }

    #[test]
    fn fractional_rate_multiplies_exactly() {
        let pickup = date(2024, 1, 5);
        let ret = date(2024, 1, 8);
        // 49.99 × 3 = 149.97, sin redondeos de punto flotante
        assert_eq!(
            rental_price(Decimal::new(4999, 2), pickup, ret),
            Decimal::new(14997, 2)
        );
    }

    #[test]
    fn allowed_transitions() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Confirmed));
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Cancelled));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Cancelled));
    }

    #[test]
    fn cancelled_is_terminal() {
        assert!(!BookingStatus::Cancelled.can_transition_to(BookingStatus::Pending));
        assert!(!BookingStatus::Cancelled.can_transition_to(BookingStatus::Confirmed));
        assert!(!BookingStatus::Cancelled.can_transition_to(BookingStatus::Cancelled));
    }

    #[test]
    fn no_op_and_backward_transitions_rejected() {
        assert!(!BookingStatus::Pending.can_transition_to(BookingStatus::Pending));
        assert!(!BookingStatus::Confirmed.can_transition_to(BookingStatus::Pending));
        assert!(!BookingStatus::Confirmed.can_transition_to(BookingStatus::Confirmed));
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&BookingStatus::Pending).unwrap(),
            "\"pending\""
        );
        let parsed: BookingStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(parsed, BookingStatus::Cancelled);
    }
}
