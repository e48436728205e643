//! Tests de flujo de reservas contra PostgreSQL real.
//!
//! Requieren una instancia con DATABASE_URL configurada (y la extensión
//! btree_gist disponible), por eso van marcados con #[ignore]:
//!
//!   DATABASE_URL=postgres://... cargo test -- --ignored

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use car_rental_backend::config::environment::EnvironmentConfig;
use car_rental_backend::controllers::booking_controller::BookingController;
use car_rental_backend::database::connection::{create_pool, run_migrations};
use car_rental_backend::models::booking::{
    BookingStatus, CancelBookingRequest, ChangeStatusRequest, CreateBookingRequest,
};
use car_rental_backend::models::car::Car;
use car_rental_backend::models::user::{User, UserRole};
use car_rental_backend::repositories::car_repository::CarRepository;
use car_rental_backend::repositories::user_repository::UserRepository;
use car_rental_backend::state::AppState;
use car_rental_backend::utils::errors::AppError;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn test_config() -> EnvironmentConfig {
    EnvironmentConfig {
        environment: "test".to_string(),
        port: 3000,
        host: "127.0.0.1".to_string(),
        jwt_secret: "test-secret".to_string(),
        jwt_expiration: 3600,
        cors_origins: vec![],
    }
}

async fn test_state() -> AppState {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for flow tests");
    let pool = create_pool(Some(&url)).await.expect("pool");
    run_migrations(&pool).await.expect("migrations");
    AppState::new(pool, test_config())
}

async fn seed_user(state: &AppState, name: &str) -> User {
    let users = UserRepository::new(state.pool.clone());
    users
        .create(
            name.to_string(),
            format!("{}+{}@example.com", name.to_lowercase(), Uuid::new_v4()),
            "not-a-real-hash".to_string(),
        )
        .await
        .expect("seed user")
}

async fn seed_owner_with_car(state: &AppState, price_per_day: Decimal) -> (User, Car) {
    let users = UserRepository::new(state.pool.clone());
    let owner = seed_user(state, "Owner").await;
    let owner = users.set_role(owner.id, UserRole::Owner).await.expect("owner role");

    let cars = CarRepository::new(state.pool.clone());
    let car = cars
        .create(
            owner.id,
            "Tesla".to_string(),
            "Model 3".to_string(),
            Some(2022),
            Some("Sedan".to_string()),
            Some(5),
            Some("Electric".to_string()),
            Some("Automatic".to_string()),
            None,
            None,
            price_per_day,
            format!("TestCity-{}", Uuid::new_v4()),
        )
        .await
        .expect("seed car");

    (owner, car)
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance reachable via DATABASE_URL"]
async fn concurrent_overlapping_requests_book_at_most_once() {
    let state = test_state().await;
    let (_owner, car) = seed_owner_with_car(&state, Decimal::new(500, 0)).await;
    let renter_a = seed_user(&state, "RenterA").await;
    let renter_b = seed_user(&state, "RenterB").await;

    let controller_a = BookingController::new(&state);
    let controller_b = BookingController::new(&state);

    let make_request = || CreateBookingRequest {
        car_id: car.id,
        pickup_date: date(2030, 1, 5),
        return_date: date(2030, 1, 8),
    };

    let (a, b) = tokio::join!(
        controller_a.create(renter_a.id, make_request()),
        controller_b.create(renter_b.id, make_request()),
    );

    let successes = a.is_ok() as u8 + b.is_ok() as u8;
    assert_eq!(successes, 1, "exactly one of the two requests must win");

    let loser = if a.is_err() { a } else { b };
    assert!(matches!(loser, Err(AppError::Conflict(_))));
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance reachable via DATABASE_URL"]
async fn touching_endpoint_conflicts_but_next_day_is_free() {
    let state = test_state().await;
    let (_owner, car) = seed_owner_with_car(&state, Decimal::new(500, 0)).await;
    let renter_a = seed_user(&state, "RenterA").await;
    let renter_b = seed_user(&state, "RenterB").await;

    let controller = BookingController::new(&state);

    controller
        .create(
            renter_a.id,
            CreateBookingRequest {
                car_id: car.id,
                pickup_date: date(2030, 2, 10),
                return_date: date(2030, 2, 15),
            },
        )
        .await
        .expect("first booking");

    // mismo día de devolución: conflicto (bordes inclusivos)
    let touching = controller
        .create(
            renter_b.id,
            CreateBookingRequest {
                car_id: car.id,
                pickup_date: date(2030, 2, 15),
                return_date: date(2030, 2, 20),
            },
        )
        .await;
    assert!(matches!(touching, Err(AppError::Conflict(_))));

    // un día después: libre
    controller
        .create(
            renter_b.id,
            CreateBookingRequest {
                car_id: car.id,
                pickup_date: date(2030, 2, 16),
                return_date: date(2030, 2, 20),
            },
        )
        .await
        .expect("next-day booking");
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance reachable via DATABASE_URL"]
async fn full_booking_lifecycle_scenario() {
    // R reserva (500/día, 3 días → 1500, pending); O confirma; R cancela;
    // R2 reserva las mismas fechas con éxito porque la cancelada no bloquea.
    let state = test_state().await;
    let (owner, car) = seed_owner_with_car(&state, Decimal::new(500, 0)).await;
    let renter = seed_user(&state, "Renter").await;
    let renter2 = seed_user(&state, "Renter2").await;

    let controller = BookingController::new(&state);

    let booking = controller
        .create(
            renter.id,
            CreateBookingRequest {
                car_id: car.id,
                pickup_date: date(2030, 3, 5),
                return_date: date(2030, 3, 8),
            },
        )
        .await
        .expect("booking");
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.price, Decimal::new(1500, 0));

    // el owner confirma
    let confirmed = controller
        .change_status(
            owner.id,
            ChangeStatusRequest {
                booking_id: booking.id,
                status: BookingStatus::Confirmed,
            },
        )
        .await
        .expect("confirm");
    assert_eq!(confirmed.status, BookingStatus::Confirmed);

    // un extraño no puede tocar la reserva
    let stranger = seed_user(&state, "Stranger").await;
    let denied = controller
        .change_status(
            stranger.id,
            ChangeStatusRequest {
                booking_id: booking.id,
                status: BookingStatus::Cancelled,
            },
        )
        .await;
    assert!(matches!(denied, Err(AppError::Unauthorized(_))));

    // el renter cancela; la segunda cancelación es ALREADY_CANCELLED
    controller
        .cancel(renter.id, CancelBookingRequest { booking_id: booking.id })
        .await
        .expect("cancel");
    let again = controller
        .cancel(renter.id, CancelBookingRequest { booking_id: booking.id })
        .await;
    assert!(matches!(again, Err(AppError::AlreadyCancelled(_))));

    // la reserva cancelada libera el hueco
    let rebooked = controller
        .create(
            renter2.id,
            CreateBookingRequest {
                car_id: car.id,
                pickup_date: date(2030, 3, 5),
                return_date: date(2030, 3, 8),
            },
        )
        .await
        .expect("rebooking after cancellation");
    assert_eq!(rebooked.status, BookingStatus::Pending);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance reachable via DATABASE_URL"]
async fn cancelled_booking_does_not_block_contained_range() {
    let state = test_state().await;
    let (_owner, car) = seed_owner_with_car(&state, Decimal::new(300, 0)).await;
    let renter_a = seed_user(&state, "RenterA").await;
    let renter_b = seed_user(&state, "RenterB").await;

    let controller = BookingController::new(&state);

    let booking = controller
        .create(
            renter_a.id,
            CreateBookingRequest {
                car_id: car.id,
                pickup_date: date(2030, 4, 10),
                return_date: date(2030, 4, 15),
            },
        )
        .await
        .expect("booking");

    controller
        .cancel(renter_a.id, CancelBookingRequest { booking_id: booking.id })
        .await
        .expect("cancel");

    controller
        .create(
            renter_b.id,
            CreateBookingRequest {
                car_id: car.id,
                pickup_date: date(2030, 4, 12),
                return_date: date(2030, 4, 14),
            },
        )
        .await
        .expect("contained range must be free after cancellation");
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance reachable via DATABASE_URL"]
async fn clear_all_reports_deleted_count() {
    let state = test_state().await;
    let (_owner, car) = seed_owner_with_car(&state, Decimal::new(100, 0)).await;
    let renter = seed_user(&state, "Renter").await;

    let controller = BookingController::new(&state);

    for offset in [0i64, 10, 20] {
        controller
            .create(
                renter.id,
                CreateBookingRequest {
                    car_id: car.id,
                    pickup_date: date(2030, 5, 1) + chrono::Duration::days(offset),
                    return_date: date(2030, 5, 3) + chrono::Duration::days(offset),
                },
            )
            .await
            .expect("booking");
    }

    let deleted = controller.clear_all(renter.id).await.expect("clear");
    assert_eq!(deleted, 3);

    let remaining = controller.get_user_bookings(renter.id).await.expect("list");
    assert!(remaining.is_empty());
}
