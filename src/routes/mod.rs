pub mod booking_routes;
pub mod owner_routes;
pub mod user_routes;
