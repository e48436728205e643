//! Repositorio de reservas
//!
//! Contiene la consulta de solapamiento (bordes inclusivos) y la sección
//! crítica check+insert de la creación de reservas, envuelta en una
//! transacción y respaldada por la restricción de exclusión del schema.

use crate::models::booking::{Booking, BookingStatus};
use crate::utils::errors::AppError;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// ¿Existe alguna reserva no cancelada del coche que solape el rango?
    ///
    /// Solapamiento inclusivo: [p1,r1] y [p2,r2] chocan si p1 <= r2 y
    /// p2 <= r1. Tocar bordes cuenta como conflicto (política deliberada:
    /// un coche devuelto el día N no puede recogerse el día N por otro
    /// renter).
    pub async fn exists_overlapping(
        &self,
        car_id: Uuid,
        pickup_date: NaiveDate,
        return_date: NaiveDate,
    ) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE car_id = $1
                  AND status <> 'cancelled'
                  AND pickup_date <= $3
                  AND return_date >= $2
            )
            "#,
        )
        .bind(car_id)
        .bind(pickup_date)
        .bind(return_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    /// Re-chequea disponibilidad e inserta la reserva en una sola
    /// transacción. Si otra instancia gana la carrera a pesar del lock por
    /// coche, la restricción de exclusión del schema rechaza el insert y
    /// se devuelve el mismo CONFLICT que en el chequeo.
    pub async fn create_if_available(
        &self,
        car_id: Uuid,
        owner_id: Uuid,
        user_id: Uuid,
        pickup_date: NaiveDate,
        return_date: NaiveDate,
        price: Decimal,
    ) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await?;

        let overlapping: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE car_id = $1
                  AND status <> 'cancelled'
                  AND pickup_date <= $3
                  AND return_date >= $2
            )
            "#,
        )
        .bind(car_id)
        .bind(pickup_date)
        .bind(return_date)
        .fetch_one(&mut *tx)
        .await?;

        if overlapping.0 {
            // rollback implícito al soltar la transacción
            return Err(AppError::Conflict("Car is not available".to_string()));
        }

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (
                id, car_id, owner_id, user_id, pickup_date, return_date,
                price, status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending', $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(car_id)
        .bind(owner_id)
        .bind(user_id)
        .bind(pickup_date)
        .bind(return_date)
        .bind(price)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_exclusion_violation)?;

        tx.commit().await?;

        Ok(booking)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Booking>, AppError> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    pub async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Booking>, AppError> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<Booking, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        Ok(booking)
    }

    /// Borrado masivo del historial del renter, sin filtrar por estado.
    /// Devuelve cuántas filas se eliminaron.
    pub async fn delete_by_user(&self, user_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM bookings WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// SQLSTATE 23P01 = exclusion_violation: otra reserva no cancelada ganó el
/// hueco entre nuestro chequeo y el insert.
fn map_exclusion_violation(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code().as_deref() == Some("23P01") {
            return AppError::Conflict("Car is not available".to_string());
        }
    }
    AppError::Database(e)
}
