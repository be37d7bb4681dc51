//! Vehicle wire types
//!
//! Incoming payloads (JSON body or multipart text parts) and the
//! display-formatted responses. `VehiclePayload::normalize` is the single
//! place where dates are parsed, the tax amount is coerced and absent
//! nested groups are default-filled; both create and update go through it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::vehicle::{BrakeInsurance, NormalizedVehicle, Permit, Tax, Vehicle};
use crate::utils::dates::{format_display, normalize_date};
use crate::utils::errors::AppError;
use crate::utils::validation::coerce_amount;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrakeInsurancePayload {
    pub insurance_no: Option<String>,
    pub expiry_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PermitPayload {
    pub permit_no: Option<String>,
    pub expiry_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaxPayload {
    pub amount: Option<Value>,
    pub expiry_date: Option<String>,
}

/// Mutable vehicle fields as sent by clients. Used for both create and
/// update; absent nested groups normalize to their empty structures.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VehiclePayload {
    pub vehicle_no: Option<String>,
    pub owner_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub brake_insurance: Option<BrakeInsurancePayload>,
    pub permit: Option<PermitPayload>,
    pub tax: Option<TaxPayload>,
    pub fitness_number: Option<String>,
    pub fitness_validity: Option<String>,
    pub puc_date: Option<String>,
}

impl VehiclePayload {
    /// Normalize every date and numeric field and fill in defaults for the
    /// nested groups. Dates fail soft to `None`; a non-numeric tax amount
    /// is the one thing that errors.
    pub fn normalize(self) -> Result<NormalizedVehicle, AppError> {
        let brake_insurance = match self.brake_insurance {
            Some(group) => BrakeInsurance {
                insurance_no: group.insurance_no.unwrap_or_default(),
                expiry_date: normalize_date(group.expiry_date.as_deref()),
            },
            None => BrakeInsurance::empty(),
        };

        let permit = match self.permit {
            Some(group) => Permit {
                permit_no: group.permit_no.unwrap_or_default(),
                expiry_date: normalize_date(group.expiry_date.as_deref()),
            },
            None => Permit::empty(),
        };

        let tax = match self.tax {
            Some(group) => Tax {
                amount: coerce_amount("tax.amount", group.amount.as_ref())?,
                expiry_date: normalize_date(group.expiry_date.as_deref()),
            },
            None => Tax::empty(),
        };

        Ok(NormalizedVehicle {
            vehicle_no: self.vehicle_no.unwrap_or_default().trim().to_string(),
            owner_name: self.owner_name,
            address: self.address,
            phone: self.phone,
            brake_insurance,
            permit,
            tax,
            fitness_number: self.fitness_number,
            fitness_validity: normalize_date(self.fitness_validity.as_deref()),
            puc_date: normalize_date(self.puc_date.as_deref()),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrakeInsuranceView {
    pub insurance_no: String,
    pub expiry_date: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitView {
    pub permit_no: String,
    pub expiry_date: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxView {
    /// Goes out as a JSON number; clients do arithmetic on it.
    #[serde(serialize_with = "rust_decimal::serde::float_option::serialize")]
    pub amount: Option<rust_decimal::Decimal>,
    pub expiry_date: String,
}

/// Mutation response: confirmation message plus the record in display form.
#[derive(Debug, Serialize)]
pub struct VehicleEnvelope {
    pub message: String,
    pub vehicle: VehicleResponse,
}

/// Vehicle in display form. Expiry dates render as `DD/MM/YYYY` or the
/// placeholder; the nested groups are always present.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleResponse {
    pub id: String,
    pub vehicle_no: String,
    pub owner_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub brake_insurance: BrakeInsuranceView,
    pub permit: PermitView,
    pub tax: TaxView,
    pub fitness_number: Option<String>,
    pub fitness_validity: String,
    pub puc_date: String,
    pub has_license_pdf: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        let brake_insurance = vehicle.brake_insurance();
        let permit = vehicle.permit();
        let tax = vehicle.tax();

        Self {
            id: vehicle.id.to_string(),
            brake_insurance: BrakeInsuranceView {
                insurance_no: brake_insurance.insurance_no,
                expiry_date: format_display(brake_insurance.expiry_date.as_ref()),
            },
            permit: PermitView {
                permit_no: permit.permit_no,
                expiry_date: format_display(permit.expiry_date.as_ref()),
            },
            tax: TaxView {
                amount: tax.amount,
                expiry_date: format_display(tax.expiry_date.as_ref()),
            },
            fitness_validity: format_display(vehicle.fitness_validity.as_ref()),
            puc_date: format_display(vehicle.puc_date.as_ref()),
            created_at: vehicle.created_at.to_rfc3339(),
            updated_at: vehicle.updated_at.to_rfc3339(),
            vehicle_no: vehicle.vehicle_no,
            owner_name: vehicle.owner_name,
            address: vehicle.address,
            phone: vehicle.phone,
            fitness_number: vehicle.fitness_number,
            has_license_pdf: vehicle.has_license_pdf,
        }
    }
}
