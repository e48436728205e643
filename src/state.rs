//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum, incluido el registro de locks por coche
//! que serializa la sección crítica check+insert de las reservas.

use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::config::environment::EnvironmentConfig;

/// Registro de locks de exclusión mutua por coche.
///
/// Dos create_booking concurrentes sobre el mismo coche se serializan aquí
/// (en un despliegue de una sola instancia); la restricción de exclusión de
/// la base de datos sigue siendo la garantía autoritativa para despliegues
/// multi-instancia.
#[derive(Clone, Default)]
pub struct CarLockRegistry {
    locks: Arc<RwLock<HashMap<Uuid, Arc<Mutex<()>>>>>,
}

impl CarLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Obtener (o crear) el lock asociado a un coche.
    pub async fn lock_for(&self, car_id: Uuid) -> Arc<Mutex<()>> {
        {
            let locks = self.locks.read().await;
            if let Some(lock) = locks.get(&car_id) {
                return Arc::clone(lock);
            }
        }

        let mut locks = self.locks.write().await;
        Arc::clone(
            locks
                .entry(car_id)
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    /// Número de coches con lock registrado (para inspección en tests)
    pub async fn registered(&self) -> usize {
        self.locks.read().await.len()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub booking_locks: CarLockRegistry,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            pool,
            config,
            booking_locks: CarLockRegistry::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_car_gets_same_lock() {
        let registry = CarLockRegistry::new();
        let car_id = Uuid::new_v4();

        let a = registry.lock_for(car_id).await;
        let b = registry.lock_for(car_id).await;

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.registered().await, 1);
    }

    #[tokio::test]
    async fn different_cars_get_independent_locks() {
        let registry = CarLockRegistry::new();

        let a = registry.lock_for(Uuid::new_v4()).await;
        let b = registry.lock_for(Uuid::new_v4()).await;

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(registry.registered().await, 2);
    }

    #[tokio::test]
    async fn lock_holder_excludes_other_tasks() {
        let registry = CarLockRegistry::new();
        let car_id = Uuid::new_v4();

        let lock = registry.lock_for(car_id).await;
        let guard = lock.lock().await;

        // mientras el guard vive, otro intento sobre el mismo coche no entra
        let other = registry.lock_for(car_id).await;
        assert!(other.try_lock().is_err());

        drop(guard);
        assert!(other.try_lock().is_ok());
    }
}
