pub mod api;
pub mod booking;
pub mod car;
pub mod user;
