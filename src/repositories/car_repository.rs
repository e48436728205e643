use crate::models::car::Car;
use crate::utils::errors::AppError;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

pub struct CarRepository {
    pool: PgPool,
}

impl CarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        owner_id: Uuid,
        brand: String,
        model: String,
        year: Option<i32>,
        category: Option<String>,
        seating_capacity: Option<i32>,
        fuel_type: Option<String>,
        transmission: Option<String>,
        image_url: Option<String>,
        description: Option<String>,
        price_per_day: Decimal,
        location: String,
    ) -> Result<Car, AppError> {
        let car = sqlx::query_as::<_, Car>(
            r#"
            INSERT INTO cars (
                id, owner_id, brand, model, year, category, seating_capacity,
                fuel_type, transmission, image_url, description, price_per_day,
                location, is_available, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, TRUE, $14)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(brand)
        .bind(model)
        .bind(year)
        .bind(category)
        .bind(seating_capacity)
        .bind(fuel_type)
        .bind(transmission)
        .bind(image_url)
        .bind(description)
        .bind(price_per_day)
        .bind(location)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(car)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Car>, AppError> {
        let car = sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(car)
    }

    /// Flota pública: coches listados (no borrados) ordenados por alta
    pub async fn find_all_listed(&self) -> Result<Vec<Car>, AppError> {
        let cars = sqlx::query_as::<_, Car>(
            "SELECT * FROM cars WHERE owner_id IS NOT NULL ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(cars)
    }

    /// Candidatos para la consulta de disponibilidad por ubicación
    pub async fn find_listed_by_location(&self, location: &str) -> Result<Vec<Car>, AppError> {
        let cars = sqlx::query_as::<_, Car>(
            r#"
            SELECT * FROM cars
            WHERE location = $1 AND is_available = TRUE AND owner_id IS NOT NULL
            ORDER BY created_at DESC
            "#,
        )
        .bind(location)
        .fetch_all(&self.pool)
        .await?;

        Ok(cars)
    }

    pub async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Car>, AppError> {
        let cars = sqlx::query_as::<_, Car>(
            "SELECT * FROM cars WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(cars)
    }

    /// Carga en bloque para poblar los listados de reservas
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Car>, AppError> {
        let cars = sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(cars)
    }

    pub async fn toggle_availability(&self, id: Uuid) -> Result<Car, AppError> {
        let car = sqlx::query_as::<_, Car>(
            "UPDATE cars SET is_available = NOT is_available WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Car not found".to_string()))?;

        Ok(car)
    }

    /// Soft delete: se anula el owner y se deslista; la fila se conserva
    /// para no romper el historial de reservas.
    pub async fn soft_delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE cars SET owner_id = NULL, is_available = FALSE WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Car not found".to_string()));
        }

        Ok(())
    }
}
