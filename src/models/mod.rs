pub mod license;
pub mod vehicle;
