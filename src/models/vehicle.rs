//! Vehicle model
//!
//! Canonical vehicle record as stored in PostgreSQL, plus the nested
//! expiry-group value types. Rows are flat; the groups are reassembled at
//! the DTO boundary so they are always present as objects on the wire,
//! even when every inner field is empty.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Brake insurance details. Always present on a record, possibly empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrakeInsurance {
    pub insurance_no: String,
    pub expiry_date: Option<DateTime<Utc>>,
}

impl BrakeInsurance {
    pub fn empty() -> Self {
        Self {
            insurance_no: String::new(),
            expiry_date: None,
        }
    }
}

/// Permit details. Same default policy as brake insurance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permit {
    pub permit_no: String,
    pub expiry_date: Option<DateTime<Utc>>,
}

impl Permit {
    pub fn empty() -> Self {
        Self {
            permit_no: String::new(),
            expiry_date: None,
        }
    }
}

/// Road tax details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tax {
    pub amount: Option<Decimal>,
    pub expiry_date: Option<DateTime<Utc>>,
}

impl Tax {
    pub fn empty() -> Self {
        Self {
            amount: None,
            expiry_date: None,
        }
    }
}

/// Vehicle row - maps to the vehicles table.
#[derive(Debug, Clone, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub vehicle_no: String,
    pub owner_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub insurance_no: String,
    pub insurance_expiry: Option<DateTime<Utc>>,
    pub permit_no: String,
    pub permit_expiry: Option<DateTime<Utc>>,
    pub tax_amount: Option<Decimal>,
    pub tax_expiry: Option<DateTime<Utc>>,
    pub fitness_number: Option<String>,
    pub fitness_validity: Option<DateTime<Utc>>,
    pub puc_date: Option<DateTime<Utc>>,
    pub has_license_pdf: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn brake_insurance(&self) -> BrakeInsurance {
        BrakeInsurance {
            insurance_no: self.insurance_no.clone(),
            expiry_date: self.insurance_expiry,
        }
    }

    pub fn permit(&self) -> Permit {
        Permit {
            permit_no: self.permit_no.clone(),
            expiry_date: self.permit_expiry,
        }
    }

    pub fn tax(&self) -> Tax {
        Tax {
            amount: self.tax_amount,
            expiry_date: self.tax_expiry,
        }
    }
}

/// Fully normalized vehicle fields, ready to persist. Produced from a wire
/// payload by the DTO layer; every nested group has been default-filled.
#[derive(Debug, Clone)]
pub struct NormalizedVehicle {
    pub vehicle_no: String,
    pub owner_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub brake_insurance: BrakeInsurance,
    pub permit: Permit,
    pub tax: Tax,
    pub fitness_number: Option<String>,
    pub fitness_validity: Option<DateTime<Utc>>,
    pub puc_date: Option<DateTime<Utc>>,
}

/// Uploaded license PDF kept inline with the vehicle row.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub file_name: String,
}
