pub mod license_controller;
pub mod vehicle_controller;
