pub mod license_repository;
pub mod vehicle_repository;
