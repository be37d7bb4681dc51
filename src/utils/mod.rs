//! Shared utilities: errors, date normalization, validation and JWT helpers.

pub mod dates;
pub mod errors;
pub mod jwt;
pub mod validation;
