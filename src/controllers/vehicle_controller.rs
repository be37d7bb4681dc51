//! Vehicle record service
//!
//! Orchestrates validation, duplicate detection, normalization defaults and
//! persistence for vehicle records. Generic over the storage backend so the
//! service rules can be exercised without a database.

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::vehicle_dto::{VehicleEnvelope, VehiclePayload, VehicleResponse};
use crate::models::vehicle::Attachment;
use crate::repositories::vehicle_repository::{VehicleRepository, VehicleStore};
use crate::utils::errors::AppError;
use crate::utils::validation::require_field;

pub struct VehicleController<S = VehicleRepository> {
    store: S,
}

impl VehicleController<VehicleRepository> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            store: VehicleRepository::new(pool),
        }
    }
}

impl<S: VehicleStore> VehicleController<S> {
    pub async fn list(&self) -> Result<Vec<VehicleResponse>, AppError> {
        let vehicles = self.store.list().await?;
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    /// Create a vehicle record.
    ///
    /// A duplicate `vehicleNo` does not write a second row, but the call
    /// still reports success with the already-stored record: the historical
    /// frontend never read failure responses on this path, so clients depend
    /// on the silent no-op. The check-then-insert race between two concurrent
    /// creates of the same number is accepted.
    pub async fn create(
        &self,
        payload: VehiclePayload,
        attachment: Option<Attachment>,
    ) -> Result<VehicleEnvelope, AppError> {
        require_field("vehicleNo", payload.vehicle_no.as_deref())?;
        let normalized = payload.normalize()?;

        if let Some(existing) = self
            .store
            .find_by_vehicle_no(&normalized.vehicle_no)
            .await?
        {
            tracing::info!("Vehicle {} already registered, create is a no-op", normalized.vehicle_no);
            return Ok(VehicleEnvelope {
                message: "Vehicle added successfully!".to_string(),
                vehicle: VehicleResponse::from(existing),
            });
        }

        let created = self.store.create(&normalized, attachment.as_ref()).await?;

        Ok(VehicleEnvelope {
            message: "Vehicle added successfully!".to_string(),
            vehicle: VehicleResponse::from(created),
        })
    }

    /// Full overwrite of the mutable fields; absent nested groups become
    /// their empty structures, never "leave unchanged".
    pub async fn update(
        &self,
        id: Uuid,
        payload: VehiclePayload,
        attachment: Option<Attachment>,
    ) -> Result<VehicleEnvelope, AppError> {
        require_field("vehicleNo", payload.vehicle_no.as_deref())?;
        let normalized = payload.normalize()?;

        let updated = self
            .store
            .update(id, &normalized, attachment.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        Ok(VehicleEnvelope {
            message: "Vehicle updated successfully!".to_string(),
            vehicle: VehicleResponse::from(updated),
        })
    }

    /// Idempotent: deleting an id that does not exist is still a success.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let removed = self.store.delete(id).await?;
        if removed == 0 {
            tracing::debug!("Delete of unknown vehicle {} treated as no-op", id);
        }
        Ok(())
    }

    pub async fn attachment(&self, id: Uuid) -> Result<Attachment, AppError> {
        match self.store.get_attachment(id).await? {
            None => Err(AppError::NotFound("Vehicle not found".to_string())),
            Some(None) => Err(AppError::NotFound(
                "Vehicle has no license PDF".to_string(),
            )),
            Some(Some(attachment)) => Ok(attachment),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vehicle::{NormalizedVehicle, Vehicle};
    use chrono::Utc;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryVehicleStore {
        rows: Mutex<Vec<Vehicle>>,
    }

    fn row_from(id: Uuid, vehicle: &NormalizedVehicle, has_pdf: bool) -> Vehicle {
        Vehicle {
            id,
            vehicle_no: vehicle.vehicle_no.clone(),
            owner_name: vehicle.owner_name.clone(),
            address: vehicle.address.clone(),
            phone: vehicle.phone.clone(),
            insurance_no: vehicle.brake_insurance.insurance_no.clone(),
            insurance_expiry: vehicle.brake_insurance.expiry_date,
            permit_no: vehicle.permit.permit_no.clone(),
            permit_expiry: vehicle.permit.expiry_date,
            tax_amount: vehicle.tax.amount,
            tax_expiry: vehicle.tax.expiry_date,
            fitness_number: vehicle.fitness_number.clone(),
            fitness_validity: vehicle.fitness_validity,
            puc_date: vehicle.puc_date,
            has_license_pdf: has_pdf,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    impl VehicleStore for MemoryVehicleStore {
        async fn create(
            &self,
            vehicle: &NormalizedVehicle,
            attachment: Option<&Attachment>,
        ) -> Result<Vehicle, AppError> {
            let row = row_from(Uuid::new_v4(), vehicle, attachment.is_some());
            self.rows.lock().unwrap().push(row.clone());
            Ok(row)
        }

        async fn find_by_vehicle_no(
            &self,
            vehicle_no: &str,
        ) -> Result<Option<Vehicle>, AppError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|v| v.vehicle_no == vehicle_no)
                .cloned())
        }

        async fn list(&self) -> Result<Vec<Vehicle>, AppError> {
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn update(
            &self,
            id: Uuid,
            vehicle: &NormalizedVehicle,
            attachment: Option<&Attachment>,
        ) -> Result<Option<Vehicle>, AppError> {
            let mut rows = self.rows.lock().unwrap();
            let Some(row) = rows.iter_mut().find(|v| v.id == id) else {
                return Ok(None);
            };
            let has_pdf = attachment.is_some() || row.has_license_pdf;
            *row = row_from(id, vehicle, has_pdf);
            Ok(Some(row.clone()))
        }

        async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|v| v.id != id);
            Ok((before - rows.len()) as u64)
        }

        async fn get_attachment(
            &self,
            id: Uuid,
        ) -> Result<Option<Option<Attachment>>, AppError> {
            let exists = self.rows.lock().unwrap().iter().any(|v| v.id == id);
            Ok(exists.then_some(None))
        }
    }

    fn controller() -> VehicleController<MemoryVehicleStore> {
        VehicleController {
            store: MemoryVehicleStore::default(),
        }
    }

    fn payload(vehicle_no: &str, owner: &str) -> VehiclePayload {
        serde_json::from_value(serde_json::json!({
            "vehicleNo": vehicle_no,
            "ownerName": owner,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_create_reports_success_without_second_row() {
        let controller = controller();

        let first = controller
            .create(payload("KA01AB1234", "R. Kumar"), None)
            .await
            .unwrap();
        let second = controller
            .create(payload("KA01AB1234", "Someone Else"), None)
            .await
            .unwrap();

        assert_eq!(second.message, "Vehicle added successfully!");
        assert_eq!(second.vehicle.id, first.vehicle.id);
        assert_eq!(second.vehicle.owner_name.as_deref(), Some("R. Kumar"));
        assert_eq!(controller.store.rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_vehicle_is_a_success() {
        let controller = controller();
        controller.delete(Uuid::new_v4()).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_unknown_vehicle_is_not_found() {
        let controller = controller();
        let err = controller
            .update(Uuid::new_v4(), payload("KA01AB1234", "R. Kumar"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_attachment_for_vehicle_without_pdf_is_not_found() {
        let controller = controller();
        let created = controller
            .create(payload("KA01AB1234", "R. Kumar"), None)
            .await
            .unwrap();

        let id: Uuid = created.vehicle.id.parse().unwrap();
        let err = controller.attachment(id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = controller.attachment(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
