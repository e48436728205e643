use anyhow::Result;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use dotenvy::dotenv;

use car_rental_backend::config::environment::EnvironmentConfig;
use car_rental_backend::database::connection::{create_pool, mask_database_url, run_migrations};
use car_rental_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::default();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(if config.is_development() {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    info!("🚗 Car Rental Marketplace - Booking API");
    info!("=======================================");

    // Inicializar base de datos
    if let Ok(url) = std::env::var("DATABASE_URL") {
        info!("📦 Base de datos: {}", mask_database_url(&url));
    }
    let pool = match create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    if let Err(e) = run_migrations(&pool).await {
        error!("❌ Error aplicando migraciones: {}", e);
        return Err(anyhow::anyhow!("Error de migraciones: {}", e));
    }
    info!("✅ Base de datos lista (migraciones aplicadas)");

    let app_state = AppState::new(pool, config.clone());
    let app = car_rental_backend::create_app(app_state);

    // Puerto del servidor
    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("👤 Usuarios:");
    info!("   POST /api/users/register - Registrar usuario");
    info!("   POST /api/users/login - Login");
    info!("   GET  /api/users/data - Usuario actual");
    info!("   GET  /api/users/cars - Flota pública");
    info!("🔑 Owner:");
    info!("   POST /api/owner/change-role - Promocionar a owner");
    info!("   POST /api/owner/add-car - Dar de alta un coche");
    info!("   GET  /api/owner/cars - Coches del owner");
    info!("   POST /api/owner/toggle-car - Conmutar listado");
    info!("   POST /api/owner/delete-car - Borrar (soft) un coche");
    info!("📅 Reservas:");
    info!("   POST /api/bookings/check-availability - Disponibilidad por ubicación y fechas");
    info!("   POST /api/bookings/create - Crear reserva");
    info!("   GET  /api/bookings/user - Reservas del renter");
    info!("   GET  /api/bookings/owner - Reservas del owner");
    info!("   POST /api/bookings/change-status - Confirmar/cancelar (owner)");
    info!("   POST /api/bookings/cancel - Cancelar (renter)");
    info!("   DELETE /api/bookings/clear-all - Vaciar historial del renter");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
