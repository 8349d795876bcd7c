use chrono::NaiveDate;
use model::entities::{invoice, student};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::RepositoryError;
use crate::repository::check_decimal_precision;

/// Invoice amounts are stored as fixed-point with 8 total digits, 2 of
/// them fractional.
const AMOUNT_MAX_DIGITS: u32 = 8;
const AMOUNT_DECIMAL_PLACES: u32 = 2;

/// Request body for creating an invoice
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateInvoiceRequest {
    pub student_id: i32,
    pub amount: Decimal,
    pub due_date: NaiveDate,
}

/// Request body for updating an invoice; only provided fields change
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateInvoiceRequest {
    pub amount: Option<Decimal>,
    pub due_date: Option<NaiveDate>,
    pub is_paid: Option<bool>,
}

/// Create an invoice owed by a student. New invoices start unpaid.
#[instrument(skip(db))]
pub async fn create(
    db: &DatabaseConnection,
    request: CreateInvoiceRequest,
) -> Result<invoice::Model, RepositoryError> {
    debug!(
        "Creating invoice of {} for student {}",
        request.amount, request.student_id
    );
    check_decimal_precision("amount", request.amount, AMOUNT_MAX_DIGITS, AMOUNT_DECIMAL_PLACES)?;

    if student::Entity::find_by_id(request.student_id).one(db).await?.is_none() {
        return Err(RepositoryError::InvalidReference(format!(
            "student with id {} does not exist",
            request.student_id
        )));
    }

    let new_invoice = invoice::ActiveModel {
        student_id: Set(request.student_id),
        amount: Set(request.amount),
        due_date: Set(request.due_date),
        is_paid: Set(false),
        ..Default::default()
    };

    let invoice_model = new_invoice.insert(db).await?;
    info!("Invoice created with id {}", invoice_model.id);
    Ok(invoice_model)
}

/// Get an invoice by id.
pub async fn get(db: &DatabaseConnection, id: i32) -> Result<invoice::Model, RepositoryError> {
    invoice::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(RepositoryError::NotFound { entity: "invoice", id })
}

/// List all invoices.
pub async fn list(db: &DatabaseConnection) -> Result<Vec<invoice::Model>, RepositoryError> {
    Ok(invoice::Entity::find().all(db).await?)
}

/// List the invoices of a student.
pub async fn list_for_student(
    db: &DatabaseConnection,
    student_id: i32,
) -> Result<Vec<invoice::Model>, RepositoryError> {
    Ok(invoice::Entity::find()
        .filter(invoice::Column::StudentId.eq(student_id))
        .all(db)
        .await?)
}

/// Update an invoice. `is_paid` is set here independently of any payments
/// recorded against the invoice; nothing reconciles the two.
#[instrument(skip(db))]
pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    request: UpdateInvoiceRequest,
) -> Result<invoice::Model, RepositoryError> {
    if let Some(amount) = request.amount {
        check_decimal_precision("amount", amount, AMOUNT_MAX_DIGITS, AMOUNT_DECIMAL_PLACES)?;
    }

    let existing = get(db, id).await?;
    let mut active: invoice::ActiveModel = existing.into();

    if let Some(amount) = request.amount {
        active.amount = Set(amount);
    }
    if let Some(due_date) = request.due_date {
        active.due_date = Set(due_date);
    }
    if let Some(is_paid) = request.is_paid {
        active.is_paid = Set(is_paid);
    }

    let updated = active.update(db).await?;
    info!("Invoice {} updated", id);
    Ok(updated)
}

/// Toggle the paid flag.
#[instrument(skip(db))]
pub async fn set_paid(
    db: &DatabaseConnection,
    id: i32,
    is_paid: bool,
) -> Result<invoice::Model, RepositoryError> {
    update(
        db,
        id,
        UpdateInvoiceRequest {
            is_paid: Some(is_paid),
            ..Default::default()
        },
    )
    .await
}

/// Delete an invoice together with its payments.
#[instrument(skip(db))]
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), RepositoryError> {
    let result = invoice::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        warn!("Invoice {} not found for deletion", id);
        return Err(RepositoryError::NotFound { entity: "invoice", id });
    }

    info!("Invoice {} deleted", id);
    Ok(())
}
