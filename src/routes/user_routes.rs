use axum::{
    extract::{Extension, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::car_controller::CarController;
use crate::controllers::user_controller::UserController;
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::models::api::ApiResponse;
use crate::models::car::CarResponse;
use crate::models::user::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_user_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/data", get(get_user_data))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/cars", get(get_cars))
        .merge(protected)
}

async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let controller = UserController::new(state.pool.clone(), state.config.clone());
    let response = controller.register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let controller = UserController::new(state.pool.clone(), state.config.clone());
    let response = controller.login(request).await?;
    Ok(Json(response))
}

async fn get_user_data(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let controller = UserController::new(state.pool.clone(), state.config.clone());
    let response = controller.get_data(user.user_id).await?;
    Ok(Json(ApiResponse::success(response)))
}

/// Flota pública para el frontend
async fn get_cars(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CarResponse>>>, AppError> {
    let controller = CarController::new(state.pool.clone());
    let cars = controller.list_all().await?;
    Ok(Json(ApiResponse::success(cars)))
}
