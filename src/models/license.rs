//! License model
//!
//! Canonical driving-license record. Independent of vehicles; the two
//! entities share no foreign keys.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// License row - maps to the licenses table.
#[derive(Debug, Clone, FromRow)]
pub struct License {
    pub id: Uuid,
    pub holder_name: String,
    pub phone: String,
    pub dob: DateTime<Utc>,
    pub license_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for a new license.
#[derive(Debug, Clone)]
pub struct NewLicense {
    pub holder_name: String,
    pub phone: String,
    pub dob: DateTime<Utc>,
    pub license_number: String,
}

/// Partial update: only `Some` fields replace the stored values.
#[derive(Debug, Clone, Default)]
pub struct LicenseChanges {
    pub holder_name: Option<String>,
    pub phone: Option<String>,
    pub dob: Option<DateTime<Utc>>,
    pub license_number: Option<String>,
}

impl LicenseChanges {
    /// Merge onto the stored record; absent fields keep their values.
    pub fn apply(self, current: License) -> License {
        License {
            id: current.id,
            holder_name: self.holder_name.unwrap_or(current.holder_name),
            phone: self.phone.unwrap_or(current.phone),
            dob: self.dob.unwrap_or(current.dob),
            license_number: self.license_number.unwrap_or(current.license_number),
            created_at: current.created_at,
            updated_at: current.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn stored() -> License {
        License {
            id: Uuid::new_v4(),
            holder_name: "A. Singh".to_string(),
            phone: "9999999999".to_string(),
            dob: Utc.with_ymd_and_hms(1990, 5, 20, 0, 0, 0).unwrap(),
            license_number: "DL-1420110012345".to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_apply_keeps_stored_values_for_absent_fields() {
        let current = stored();
        let id = current.id;

        let merged = LicenseChanges {
            phone: Some("8888888888".to_string()),
            ..LicenseChanges::default()
        }
        .apply(current);

        assert_eq!(merged.id, id);
        assert_eq!(merged.phone, "8888888888");
        assert_eq!(merged.holder_name, "A. Singh");
        assert_eq!(merged.license_number, "DL-1420110012345");
        assert_eq!(merged.dob, Utc.with_ymd_and_hms(1990, 5, 20, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_apply_with_no_changes_is_identity() {
        let current = stored();
        let before = current.clone();
        let merged = LicenseChanges::default().apply(current);

        assert_eq!(merged.holder_name, before.holder_name);
        assert_eq!(merged.phone, before.phone);
        assert_eq!(merged.dob, before.dob);
        assert_eq!(merged.license_number, before.license_number);
    }
}
