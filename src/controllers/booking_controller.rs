//! Booking Lifecycle Manager
//!
//! Crea reservas (revalidando disponibilidad bajo el lock por coche),
//! lista reservas por renter/owner y aplica las transiciones de estado
//! con sus chequeos de propiedad.

use std::collections::HashMap;

use uuid::Uuid;

use crate::middleware::auth::AuthenticatedUser;
use crate::models::booking::{
    rental_price, Booking, BookingResponse, BookingStatus, CancelBookingRequest,
    ChangeStatusRequest, CheckAvailabilityRequest, CreateBookingRequest, OwnerBookingResponse,
    RenterSummary,
};
use crate::models::car::{Car, CarResponse};
use crate::models::user::UserRole;
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::car_repository::CarRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::availability_service::AvailabilityService;
use crate::state::{AppState, CarLockRegistry};
use crate::utils::errors::{validation_error, AppError};
use crate::utils::validation::{validate_date_range, validate_not_empty};

pub struct BookingController {
    bookings: BookingRepository,
    cars: CarRepository,
    users: UserRepository,
    availability: AvailabilityService,
    locks: CarLockRegistry,
}

impl BookingController {
    pub fn new(state: &AppState) -> Self {
        Self {
            bookings: BookingRepository::new(state.pool.clone()),
            cars: CarRepository::new(state.pool.clone()),
            users: UserRepository::new(state.pool.clone()),
            availability: AvailabilityService::new(state.pool.clone()),
            locks: state.booking_locks.clone(),
        }
    }

    /// Consulta pública de flota: coches de una ubicación libres en el rango
    pub async fn check_availability(
        &self,
        request: CheckAvailabilityRequest,
    ) -> Result<Vec<CarResponse>, AppError> {
        validate_not_empty(&request.location)
            .map_err(|_| validation_error("location", "location is required"))?;
        validate_date_range(request.pickup_date, request.return_date)
            .map_err(|_| validation_error("pickup_date", "pickup_date must be on or before return_date"))?;

        let cars = self
            .availability
            .list_available_cars(&request.location, request.pickup_date, request.return_date)
            .await?;

        Ok(cars.into_iter().map(CarResponse::from).collect())
    }

    /// Crear una reserva.
    ///
    /// La sección crítica (re-chequeo de disponibilidad + insert) corre con
    /// el lock del coche tomado y dentro de una transacción; la restricción
    /// de exclusión del schema cubre despliegues multi-instancia.
    pub async fn create(
        &self,
        user_id: Uuid,
        request: CreateBookingRequest,
    ) -> Result<BookingResponse, AppError> {
        validate_date_range(request.pickup_date, request.return_date)
            .map_err(|_| validation_error("pickup_date", "pickup_date must be on or before return_date"))?;

        let car = self
            .cars
            .find_by_id(request.car_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Car not found".to_string()))?;

        // un coche borrado (owner en NULL) no se puede reservar: la reserva
        // necesita el snapshot del owner
        let owner_id = car
            .owner_id
            .ok_or_else(|| AppError::NotFound("Car not found".to_string()))?;

        let price = rental_price(car.price_per_day, request.pickup_date, request.return_date);

        let lock = self.locks.lock_for(request.car_id).await;
        let _guard = lock.lock().await;

        let booking = self
            .bookings
            .create_if_available(
                request.car_id,
                owner_id,
                user_id,
                request.pickup_date,
                request.return_date,
                price,
            )
            .await?;

        tracing::info!(
            booking_id = %booking.id,
            car_id = %booking.car_id,
            "booking created"
        );

        Ok(populate_booking(booking, Some(car)))
    }

    /// Reservas del renter, con su coche poblado, más recientes primero
    pub async fn get_user_bookings(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<BookingResponse>, AppError> {
        let bookings = self.bookings.find_by_user(user_id).await?;
        let cars = self.load_cars(&bookings).await?;

        Ok(bookings
            .into_iter()
            .map(|b| {
                let car = cars.get(&b.car_id).cloned();
                populate_booking(b, car)
            })
            .collect())
    }

    /// Reservas sobre los coches del owner, con coche y renter poblados.
    /// Solo accesible con rol owner.
    pub async fn get_owner_bookings(
        &self,
        caller: &AuthenticatedUser,
    ) -> Result<Vec<OwnerBookingResponse>, AppError> {
        if caller.role != UserRole::Owner {
            return Err(AppError::Unauthorized("Unauthorized".to_string()));
        }

        let bookings = self.bookings.find_by_owner(caller.user_id).await?;
        let cars = self.load_cars(&bookings).await?;

        let renter_ids: Vec<Uuid> = bookings.iter().map(|b| b.user_id).collect();
        let renters: HashMap<Uuid, RenterSummary> = self
            .users
            .find_by_ids(&renter_ids)
            .await?
            .into_iter()
            .map(|u| {
                (
                    u.id,
                    RenterSummary {
                        id: u.id,
                        name: u.name,
                        email: u.email,
                    },
                )
            })
            .collect();

        Ok(bookings
            .into_iter()
            .map(|b| OwnerBookingResponse {
                id: b.id,
                car: cars.get(&b.car_id).cloned().map(CarResponse::from),
                renter: renters.get(&b.user_id).map(|r| RenterSummary {
                    id: r.id,
                    name: r.name.clone(),
                    email: r.email.clone(),
                }),
                pickup_date: b.pickup_date,
                return_date: b.return_date,
                price: b.price,
                status: b.status,
                created_at: b.created_at,
            })
            .collect())
    }

    /// El owner confirma o cancela una reserva suya.
    ///
    /// El estado es una enumeración cerrada y solo se aceptan las
    /// transiciones de la tabla (pending→confirmed, pending→cancelled,
    /// confirmed→cancelled).
    pub async fn change_status(
        &self,
        caller_id: Uuid,
        request: ChangeStatusRequest,
    ) -> Result<BookingResponse, AppError> {
        let booking = self
            .bookings
            .find_by_id(request.booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        if booking.owner_id != caller_id {
            return Err(AppError::Unauthorized("Unauthorized".to_string()));
        }

        if !booking.status.can_transition_to(request.status) {
            return Err(AppError::Conflict(format!(
                "Cannot change booking status from {} to {}",
                booking.status.as_str(),
                request.status.as_str()
            )));
        }

        let updated = self
            .bookings
            .update_status(booking.id, request.status)
            .await?;

        tracing::info!(
            booking_id = %updated.id,
            status = updated.status.as_str(),
            "booking status updated"
        );

        Ok(populate_booking(updated, None))
    }

    /// El renter cancela su propia reserva (idempotencia protegida con
    /// ALREADY_CANCELLED).
    pub async fn cancel(
        &self,
        caller_id: Uuid,
        request: CancelBookingRequest,
    ) -> Result<BookingResponse, AppError> {
        let booking = self
            .bookings
            .find_by_id(request.booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        if booking.user_id != caller_id {
            return Err(AppError::Unauthorized("Unauthorized".to_string()));
        }

        if booking.status == BookingStatus::Cancelled {
            return Err(AppError::AlreadyCancelled(
                "Booking is already cancelled".to_string(),
            ));
        }

        let updated = self
            .bookings
            .update_status(booking.id, BookingStatus::Cancelled)
            .await?;

        tracing::info!(booking_id = %updated.id, "booking cancelled by renter");

        Ok(populate_booking(updated, None))
    }

    /// Borra todo el historial de reservas del renter y devuelve el total.
    /// No filtra por estado: también elimina pending/confirmed de SU vista;
    /// la vista del owner (indexada por owner_id) no se toca.
    pub async fn clear_all(&self, user_id: Uuid) -> Result<u64, AppError> {
        let deleted = self.bookings.delete_by_user(user_id).await?;
        tracing::info!(user_id = %user_id, deleted, "booking history cleared");
        Ok(deleted)
    }

    async fn load_cars(&self, bookings: &[Booking]) -> Result<HashMap<Uuid, Car>, AppError> {
        let car_ids: Vec<Uuid> = bookings.iter().map(|b| b.car_id).collect();
        let cars = self.cars.find_by_ids(&car_ids).await?;
        Ok(cars.into_iter().map(|c| (c.id, c)).collect())
    }
}

fn populate_booking(booking: Booking, car: Option<Car>) -> BookingResponse {
    BookingResponse {
        id: booking.id,
        car: car.map(CarResponse::from),
        owner_id: booking.owner_id,
        user_id: booking.user_id,
        pickup_date: booking.pickup_date,
        return_date: booking.return_date,
        price: booking.price,
        status: booking.status,
        created_at: booking.created_at,
    }
}
