pub mod availability_service;
