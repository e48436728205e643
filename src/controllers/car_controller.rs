//! Gestión de coches del owner
//!
//! Alta de coches, listado propio, toggle de disponibilidad de listado y
//! soft delete. El borrado nunca elimina la fila: anula el owner y
//! deslista el coche para preservar el historial de reservas.

use uuid::Uuid;
use validator::Validate;

use crate::middleware::auth::AuthenticatedUser;
use crate::models::car::{CarResponse, CreateCarRequest};
use crate::models::user::UserRole;
use crate::repositories::car_repository::CarRepository;
use crate::utils::errors::AppError;

pub struct CarController {
    cars: CarRepository,
}

impl CarController {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self {
            cars: CarRepository::new(pool),
        }
    }

    pub async fn add_car(
        &self,
        caller: &AuthenticatedUser,
        request: CreateCarRequest,
    ) -> Result<CarResponse, AppError> {
        if caller.role != UserRole::Owner {
            return Err(AppError::Unauthorized("Unauthorized".to_string()));
        }

        request.validate()?;

        if request.price_per_day <= rust_decimal::Decimal::ZERO {
            return Err(AppError::BadRequest(
                "price_per_day must be positive".to_string(),
            ));
        }

        let car = self
            .cars
            .create(
                caller.user_id,
                request.brand,
                request.model,
                request.year,
                request.category,
                request.seating_capacity,
                request.fuel_type,
                request.transmission,
                request.image_url,
                request.description,
                request.price_per_day,
                request.location,
            )
            .await?;

        tracing::info!(car_id = %car.id, owner_id = %caller.user_id, "car listed");

        Ok(CarResponse::from(car))
    }

    /// Flota pública completa (coches no borrados)
    pub async fn list_all(&self) -> Result<Vec<CarResponse>, AppError> {
        let cars = self.cars.find_all_listed().await?;
        Ok(cars.into_iter().map(CarResponse::from).collect())
    }

    pub async fn list_owner_cars(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<CarResponse>, AppError> {
        let cars = self.cars.find_by_owner(owner_id).await?;
        Ok(cars.into_iter().map(CarResponse::from).collect())
    }

    /// Conmutar el flag de listado del coche. Es independiente de la
    /// disponibilidad por fechas.
    pub async fn toggle_availability(
        &self,
        caller_id: Uuid,
        car_id: Uuid,
    ) -> Result<CarResponse, AppError> {
        self.ensure_owned_by(car_id, caller_id).await?;
        let car = self.cars.toggle_availability(car_id).await?;
        Ok(CarResponse::from(car))
    }

    pub async fn delete_car(&self, caller_id: Uuid, car_id: Uuid) -> Result<(), AppError> {
        self.ensure_owned_by(car_id, caller_id).await?;
        self.cars.soft_delete(car_id).await?;
        tracing::info!(car_id = %car_id, "car soft-deleted");
        Ok(())
    }

    async fn ensure_owned_by(&self, car_id: Uuid, caller_id: Uuid) -> Result<(), AppError> {
        let car = self
            .cars
            .find_by_id(car_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Car not found".to_string()))?;

        if car.owner_id != Some(caller_id) {
            return Err(AppError::Unauthorized("Unauthorized".to_string()));
        }

        Ok(())
    }
}
