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
use crate::models::car::{CarIdRequest, CarResponse, CreateCarRequest};
use crate::models::user::UserResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_owner_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/change-role", post(change_role))
        .route("/add-car", post(add_car))
        .route("/cars", get(get_owner_cars))
        .route("/toggle-car", post(toggle_car))
        .route("/delete-car", post(delete_car))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn change_role(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let controller = UserController::new(state.pool.clone(), state.config.clone());
    let response = controller.change_role_to_owner(user.user_id).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Now you can list cars".to_string(),
    )))
}

async fn add_car(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<CreateCarRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CarResponse>>), AppError> {
    let controller = CarController::new(state.pool.clone());
    let car = controller.add_car(&user, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            car,
            "Car added".to_string(),
        )),
    ))
}

async fn get_owner_cars(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CarResponse>>>, AppError> {
    let controller = CarController::new(state.pool.clone());
    let cars = controller.list_owner_cars(user.user_id).await?;
    Ok(Json(ApiResponse::success(cars)))
}

async fn toggle_car(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<CarIdRequest>,
) -> Result<Json<ApiResponse<CarResponse>>, AppError> {
    let controller = CarController::new(state.pool.clone());
    let car = controller
        .toggle_availability(user.user_id, request.car_id)
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        car,
        "Availability toggled".to_string(),
    )))
}

async fn delete_car(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<CarIdRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = CarController::new(state.pool.clone());
    controller.delete_car(user.user_id, request.car_id).await?;
    Ok(Json(ApiResponse::message_only("Car removed".to_string())))
}
