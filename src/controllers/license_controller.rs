//! License record service

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::license_dto::{
    CreateLicenseRequest, LicenseEnvelope, LicenseResponse, UpdateLicenseRequest,
};
use crate::repositories::license_repository::{LicenseRepository, LicenseStore};
use crate::utils::errors::AppError;

pub struct LicenseController<S = LicenseRepository> {
    store: S,
}

impl LicenseController<LicenseRepository> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            store: LicenseRepository::new(pool),
        }
    }
}

impl<S: LicenseStore> LicenseController<S> {
    pub async fn list(&self) -> Result<Vec<LicenseResponse>, AppError> {
        let licenses = self.store.list().await?;
        Ok(licenses.into_iter().map(LicenseResponse::from).collect())
    }

    /// Persists unconditionally; the storage-level UNIQUE constraint is what
    /// rejects a duplicate license number, surfacing as a conflict.
    pub async fn create(
        &self,
        request: CreateLicenseRequest,
    ) -> Result<LicenseEnvelope, AppError> {
        let license = request.validate()?;
        let created = self.store.create(&license).await?;

        Ok(LicenseEnvelope {
            message: "License added successfully!".to_string(),
            license: LicenseResponse::from(created),
        })
    }

    /// Partial update: the change set is merged onto the stored record, so
    /// absent fields keep their values.
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateLicenseRequest,
    ) -> Result<LicenseEnvelope, AppError> {
        let changes = request.validate()?;

        let Some(current) = self.store.find_by_id(id).await? else {
            return Err(AppError::NotFound("License not found".to_string()));
        };

        let merged = changes.apply(current);
        let updated = self
            .store
            .update(&merged)
            .await?
            .ok_or_else(|| AppError::NotFound("License not found".to_string()))?;

        Ok(LicenseEnvelope {
            message: "License updated successfully!".to_string(),
            license: LicenseResponse::from(updated),
        })
    }

    /// Strict delete: removing an unknown id is an error here, unlike the
    /// vehicle path.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let removed = self.store.delete(id).await?;
        if removed == 0 {
            return Err(AppError::NotFound("License not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::license::{License, NewLicense};
    use chrono::Utc;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryLicenseStore {
        rows: Mutex<Vec<License>>,
    }

    impl LicenseStore for MemoryLicenseStore {
        async fn create(&self, license: &NewLicense) -> Result<License, AppError> {
            let mut rows = self.rows.lock().unwrap();
            if rows.iter().any(|l| l.license_number == license.license_number) {
                return Err(AppError::Conflict(
                    "License number is already registered".to_string(),
                ));
            }

            let row = License {
                id: Uuid::new_v4(),
                holder_name: license.holder_name.clone(),
                phone: license.phone.clone(),
                dob: license.dob,
                license_number: license.license_number.clone(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            rows.push(row.clone());
            Ok(row)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<License>, AppError> {
            Ok(self.rows.lock().unwrap().iter().find(|l| l.id == id).cloned())
        }

        async fn list(&self) -> Result<Vec<License>, AppError> {
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn update(&self, license: &License) -> Result<Option<License>, AppError> {
            let mut rows = self.rows.lock().unwrap();
            if rows
                .iter()
                .any(|l| l.id != license.id && l.license_number == license.license_number)
            {
                return Err(AppError::Conflict(
                    "License number is already registered".to_string(),
                ));
            }

            let Some(row) = rows.iter_mut().find(|l| l.id == license.id) else {
                return Ok(None);
            };
            *row = license.clone();
            Ok(Some(row.clone()))
        }

        async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|l| l.id != id);
            Ok((before - rows.len()) as u64)
        }
    }

    fn controller() -> LicenseController<MemoryLicenseStore> {
        LicenseController {
            store: MemoryLicenseStore::default(),
        }
    }

    fn create_request(number: &str) -> CreateLicenseRequest {
        serde_json::from_value(serde_json::json!({
            "holderName": "A. Singh",
            "phone": "9999999999",
            "dob": "1990-05-20",
            "licenseNumber": number,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_license_number_is_a_conflict() {
        let controller = controller();

        controller.create(create_request("DL-1")).await.unwrap();
        let err = controller.create(create_request("DL-1")).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(controller.store.rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_partial_update_preserves_stored_fields() {
        let controller = controller();
        let created = controller.create(create_request("DL-1")).await.unwrap();
        let id: Uuid = created.license.id.parse().unwrap();

        let request: UpdateLicenseRequest =
            serde_json::from_value(serde_json::json!({ "phone": "8888888888" })).unwrap();
        let updated = controller.update(id, request).await.unwrap();

        assert_eq!(updated.license.phone, "8888888888");
        assert_eq!(updated.license.holder_name, "A. Singh");
        assert_eq!(updated.license.license_number, "DL-1");
        assert_eq!(updated.license.dob, "20/05/1990");
    }

    #[tokio::test]
    async fn test_update_to_taken_number_is_a_conflict() {
        let controller = controller();
        controller.create(create_request("DL-1")).await.unwrap();
        let created = controller.create(create_request("DL-2")).await.unwrap();
        let id: Uuid = created.license.id.parse().unwrap();

        let request: UpdateLicenseRequest =
            serde_json::from_value(serde_json::json!({ "licenseNumber": "DL-1" })).unwrap();
        let err = controller.update(id, request).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_unknown_license_is_not_found() {
        let controller = controller();
        let err = controller.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_unknown_license_is_not_found() {
        let controller = controller();
        let request: UpdateLicenseRequest =
            serde_json::from_value(serde_json::json!({ "phone": "8888888888" })).unwrap();
        let err = controller.update(Uuid::new_v4(), request).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
