//! License wire types
//!
//! The create payload is fail-loud: holder name, phone, license number and
//! a parseable date of birth are all required. Updates are partial.

use serde::{Deserialize, Serialize};

use crate::models::license::{License, LicenseChanges, NewLicense};
use crate::utils::dates::{format_display, parse_date};
use crate::utils::errors::AppError;
use crate::utils::validation::require_field;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateLicenseRequest {
    pub holder_name: Option<String>,
    pub phone: Option<String>,
    pub dob: Option<String>,
    pub license_number: Option<String>,
}

impl CreateLicenseRequest {
    pub fn validate(self) -> Result<NewLicense, AppError> {
        let holder_name = require_field("holderName", self.holder_name.as_deref())?.to_string();
        let phone = require_field("phone", self.phone.as_deref())?.to_string();
        let license_number =
            require_field("licenseNumber", self.license_number.as_deref())?.to_string();

        let raw_dob = require_field("dob", self.dob.as_deref())?;
        let dob = parse_date(raw_dob)
            .ok_or_else(|| AppError::Validation("dob must be a valid date".to_string()))?;

        Ok(NewLicense {
            holder_name,
            phone,
            dob,
            license_number,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateLicenseRequest {
    pub holder_name: Option<String>,
    pub phone: Option<String>,
    pub dob: Option<String>,
    pub license_number: Option<String>,
}

impl UpdateLicenseRequest {
    /// Convert to a partial change set. A `dob` that is present must parse;
    /// identity fields stay fail-loud even on update.
    pub fn validate(self) -> Result<LicenseChanges, AppError> {
        let dob = match self.dob.as_deref() {
            Some(raw) => Some(parse_date(raw).ok_or_else(|| {
                AppError::Validation("dob must be a valid date".to_string())
            })?),
            None => None,
        };

        Ok(LicenseChanges {
            holder_name: self.holder_name,
            phone: self.phone,
            dob,
            license_number: self.license_number,
        })
    }
}

/// Mutation response: confirmation message plus the record in display form.
#[derive(Debug, Serialize)]
pub struct LicenseEnvelope {
    pub message: String,
    pub license: LicenseResponse,
}

/// License in display form; all dates render `DD/MM/YYYY`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseResponse {
    pub id: String,
    pub holder_name: String,
    pub phone: String,
    pub dob: String,
    pub license_number: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<License> for LicenseResponse {
    fn from(license: License) -> Self {
        Self {
            id: license.id.to_string(),
            dob: format_display(Some(&license.dob)),
            created_at: format_display(Some(&license.created_at)),
            updated_at: format_display(Some(&license.updated_at)),
            holder_name: license.holder_name,
            phone: license.phone,
            license_number: license.license_number,
        }
    }
}
