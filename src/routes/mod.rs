pub mod auth_routes;
pub mod license_routes;
pub mod vehicle_routes;
