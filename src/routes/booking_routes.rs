use axum::{
    extract::{Extension, State},
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};

use crate::controllers::booking_controller::BookingController;
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::models::api::ApiResponse;
use crate::models::booking::{
    BookingResponse, CancelBookingRequest, ChangeStatusRequest, CheckAvailabilityRequest,
    CreateBookingRequest, OwnerBookingResponse,
};
use crate::models::car::CarResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_booking_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/create", post(create_booking))
        .route("/user", get(get_user_bookings))
        .route("/owner", get(get_owner_bookings))
        .route("/change-status", post(change_status))
        .route("/cancel", post(cancel_booking))
        .route("/clear-all", delete(clear_all_bookings))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/check-availability", post(check_availability))
        .merge(protected)
}

async fn check_availability(
    State(state): State<AppState>,
    Json(request): Json<CheckAvailabilityRequest>,
) -> Result<Json<ApiResponse<Vec<CarResponse>>>, AppError> {
    let controller = BookingController::new(&state);
    let cars = controller.check_availability(request).await?;
    Ok(Json(ApiResponse::success(cars)))
}

async fn create_booking(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BookingResponse>>), AppError> {
    let controller = BookingController::new(&state);
    let booking = controller.create(user.user_id, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            booking,
            "Booking created".to_string(),
        )),
    ))
}

async fn get_user_bookings(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<BookingResponse>>>, AppError> {
    let controller = BookingController::new(&state);
    let bookings = controller.get_user_bookings(user.user_id).await?;
    Ok(Json(ApiResponse::success(bookings)))
}

async fn get_owner_bookings(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<OwnerBookingResponse>>>, AppError> {
    let controller = BookingController::new(&state);
    let bookings = controller.get_owner_bookings(&user).await?;
    Ok(Json(ApiResponse::success(bookings)))
}

async fn change_status(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<ChangeStatusRequest>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let controller = BookingController::new(&state);
    let booking = controller.change_status(user.user_id, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        booking,
        "Status updated".to_string(),
    )))
}

async fn cancel_booking(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<CancelBookingRequest>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let controller = BookingController::new(&state);
    let booking = controller.cancel(user.user_id, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        booking,
        "Booking cancelled successfully".to_string(),
    )))
}

async fn clear_all_bookings(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = BookingController::new(&state);
    let deleted = controller.clear_all(user.user_id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "deleted": deleted,
        "message": format!("Cleared {} booking(s) from history", deleted)
    })))
}
