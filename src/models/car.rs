//! Modelo de Car
//!
//! Este módulo contiene el struct Car y sus variantes para CRUD operations.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Car principal - mapea exactamente a la tabla cars
///
/// `owner_id` queda en NULL cuando el coche se borra (soft delete): la fila
/// se conserva para que el historial de reservas siga siendo atribuible.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Car {
    pub id: Uuid,
    pub owner_id: Option<Uuid>,
    pub brand: String,
    pub model: String,
    pub year: Option<i32>,
    pub category: Option<String>,
    pub seating_capacity: Option<i32>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub price_per_day: Decimal,
    pub location: String,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

/// Request para dar de alta un coche
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCarRequest {
    #[validate(length(min = 1, max = 100))]
    pub brand: String,

    #[validate(length(min = 1, max = 100))]
    pub model: String,

    #[validate(range(min = 1950, max = 2030))]
    pub year: Option<i32>,

    pub category: Option<String>,

    #[validate(range(min = 1, max = 12))]
    pub seating_capacity: Option<i32>,

    pub fuel_type: Option<String>,
    pub transmission: Option<String>,

    // la subida/transformación de imágenes es un colaborador externo;
    // aquí solo se guarda la URL resultante
    #[validate(url)]
    pub image_url: Option<String>,

    pub description: Option<String>,

    pub price_per_day: Decimal,

    #[validate(length(min = 1, max = 100))]
    pub location: String,
}

/// Request que solo referencia un coche (toggle / delete)
#[derive(Debug, Deserialize)]
pub struct CarIdRequest {
    pub car_id: Uuid,
}

/// Response de coche para la API
#[derive(Debug, Serialize)]
pub struct CarResponse {
    pub id: Uuid,
    pub owner_id: Option<Uuid>,
    pub brand: String,
    pub model: String,
    pub year: Option<i32>,
    pub category: Option<String>,
    pub seating_capacity: Option<i32>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub price_per_day: Decimal,
    pub location: String,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Car> for CarResponse {
    fn from(car: Car) -> Self {
        Self {
            id: car.id,
            owner_id: car.owner_id,
            brand: car.brand,
            model: car.model,
            year: car.year,
            category: car.category,
            seating_capacity: car.seating_capacity,
            fuel_type: car.fuel_type,
            transmission: car.transmission,
            image_url: car.image_url,
            description: car.description,
            price_per_day: car.price_per_day,
            location: car.location,
            is_available: car.is_available,
            created_at: car.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_car_request_requires_brand_and_location() {
        let request = CreateCarRequest {
            brand: "".to_string(),
            model: "Model 3".to_string(),
            year: Some(2022),
            category: None,
            seating_capacity: Some(5),
            fuel_type: None,
            transmission: None,
            image_url: None,
            description: None,
            price_per_day: Decimal::new(500, 0),
            location: "Madrid".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
