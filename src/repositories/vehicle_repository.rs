//! Vehicle persistence
//!
//! All SQL for the vehicles table. The license PDF lives inline on the row;
//! list/detail queries project a `has_license_pdf` flag instead of dragging
//! the blob through every read.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::vehicle::{Attachment, NormalizedVehicle, Vehicle};
use crate::utils::errors::AppError;

const VEHICLE_COLUMNS: &str = "id, vehicle_no, owner_name, address, phone, insurance_no, \
     insurance_expiry, permit_no, permit_expiry, tax_amount, tax_expiry, fitness_number, \
     fitness_validity, puc_date, (license_pdf IS NOT NULL) AS has_license_pdf, \
     created_at, updated_at";

/// Storage operations the vehicle service depends on.
#[allow(async_fn_in_trait)]
pub trait VehicleStore {
    async fn create(
        &self,
        vehicle: &NormalizedVehicle,
        attachment: Option<&Attachment>,
    ) -> Result<Vehicle, AppError>;
    async fn find_by_vehicle_no(&self, vehicle_no: &str) -> Result<Option<Vehicle>, AppError>;
    async fn list(&self) -> Result<Vec<Vehicle>, AppError>;
    async fn update(
        &self,
        id: Uuid,
        vehicle: &NormalizedVehicle,
        attachment: Option<&Attachment>,
    ) -> Result<Option<Vehicle>, AppError>;
    async fn delete(&self, id: Uuid) -> Result<u64, AppError>;
    async fn get_attachment(&self, id: Uuid) -> Result<Option<Option<Attachment>>, AppError>;
}

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl VehicleStore for VehicleRepository {
    async fn create(
        &self,
        vehicle: &NormalizedVehicle,
        attachment: Option<&Attachment>,
    ) -> Result<Vehicle, AppError> {
        let id = Uuid::new_v4();

        let created = sqlx::query_as::<_, Vehicle>(&format!(
            r#"
            INSERT INTO vehicles (id, vehicle_no, owner_name, address, phone, insurance_no,
                insurance_expiry, permit_no, permit_expiry, tax_amount, tax_expiry,
                fitness_number, fitness_validity, puc_date,
                license_pdf, license_pdf_content_type, license_pdf_file_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING {VEHICLE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&vehicle.vehicle_no)
        .bind(&vehicle.owner_name)
        .bind(&vehicle.address)
        .bind(&vehicle.phone)
        .bind(&vehicle.brake_insurance.insurance_no)
        .bind(vehicle.brake_insurance.expiry_date)
        .bind(&vehicle.permit.permit_no)
        .bind(vehicle.permit.expiry_date)
        .bind(vehicle.tax.amount)
        .bind(vehicle.tax.expiry_date)
        .bind(&vehicle.fitness_number)
        .bind(vehicle.fitness_validity)
        .bind(vehicle.puc_date)
        .bind(attachment.map(|a| a.bytes.clone()))
        .bind(attachment.map(|a| a.content_type.clone()))
        .bind(attachment.map(|a| a.file_name.clone()))
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_vehicle_no(&self, vehicle_no: &str) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(&format!(
            "SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE vehicle_no = $1"
        ))
        .bind(vehicle_no)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    /// Most recently updated first.
    async fn list(&self) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(&format!(
            "SELECT {VEHICLE_COLUMNS} FROM vehicles ORDER BY updated_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    /// Full overwrite of the mutable fields. The stored attachment is
    /// replaced only when a new one is supplied.
    async fn update(
        &self,
        id: Uuid,
        vehicle: &NormalizedVehicle,
        attachment: Option<&Attachment>,
    ) -> Result<Option<Vehicle>, AppError> {
        let query = if attachment.is_some() {
            format!(
                r#"
                UPDATE vehicles
                SET vehicle_no = $2, owner_name = $3, address = $4, phone = $5,
                    insurance_no = $6, insurance_expiry = $7, permit_no = $8,
                    permit_expiry = $9, tax_amount = $10, tax_expiry = $11,
                    fitness_number = $12, fitness_validity = $13, puc_date = $14,
                    license_pdf = $15, license_pdf_content_type = $16,
                    license_pdf_file_name = $17, updated_at = now()
                WHERE id = $1
                RETURNING {VEHICLE_COLUMNS}
                "#
            )
        } else {
            format!(
                r#"
                UPDATE vehicles
                SET vehicle_no = $2, owner_name = $3, address = $4, phone = $5,
                    insurance_no = $6, insurance_expiry = $7, permit_no = $8,
                    permit_expiry = $9, tax_amount = $10, tax_expiry = $11,
                    fitness_number = $12, fitness_validity = $13, puc_date = $14,
                    updated_at = now()
                WHERE id = $1
                RETURNING {VEHICLE_COLUMNS}
                "#
            )
        };

        let mut q = sqlx::query_as::<_, Vehicle>(&query)
            .bind(id)
            .bind(&vehicle.vehicle_no)
            .bind(&vehicle.owner_name)
            .bind(&vehicle.address)
            .bind(&vehicle.phone)
            .bind(&vehicle.brake_insurance.insurance_no)
            .bind(vehicle.brake_insurance.expiry_date)
            .bind(&vehicle.permit.permit_no)
            .bind(vehicle.permit.expiry_date)
            .bind(vehicle.tax.amount)
            .bind(vehicle.tax.expiry_date)
            .bind(&vehicle.fitness_number)
            .bind(vehicle.fitness_validity)
            .bind(vehicle.puc_date);

        if let Some(attachment) = attachment {
            q = q
                .bind(&attachment.bytes)
                .bind(&attachment.content_type)
                .bind(&attachment.file_name);
        }

        let updated = q.fetch_optional(&self.pool).await?;

        Ok(updated)
    }

    /// Returns the number of rows removed; deleting an unknown id is not an
    /// error at this layer.
    async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Stored attachment for a vehicle. Outer `None` means the vehicle does
    /// not exist; inner `None` means it has no file.
    async fn get_attachment(
        &self,
        id: Uuid,
    ) -> Result<Option<Option<Attachment>>, AppError> {
        let row: Option<(Option<Vec<u8>>, Option<String>, Option<String>)> = sqlx::query_as(
            "SELECT license_pdf, license_pdf_content_type, license_pdf_file_name \
             FROM vehicles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(bytes, content_type, file_name)| {
            match (bytes, content_type, file_name) {
                (Some(bytes), Some(content_type), Some(file_name)) => Some(Attachment {
                    bytes,
                    content_type,
                    file_name,
                }),
                _ => None,
            }
        }))
    }
}
