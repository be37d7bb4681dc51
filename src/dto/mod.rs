pub mod auth_dto;
pub mod license_dto;
pub mod vehicle_dto;
