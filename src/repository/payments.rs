use model::entities::{invoice, payment};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::RepositoryError;
use crate::repository::{check_decimal_precision, today};

const AMOUNT_MAX_DIGITS: u32 = 8;
const AMOUNT_DECIMAL_PLACES: u32 = 2;

/// Request body for recording a payment against an invoice
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreatePaymentRequest {
    pub invoice_id: i32,
    pub amount: Decimal,
}

/// Record a payment toward an invoice. The payment date is stamped with
/// the current date and the record never changes afterwards.
///
/// No check relates the payment total to the invoice amount, and recording
/// a payment does not touch the invoice's paid flag.
#[instrument(skip(db))]
pub async fn create(
    db: &DatabaseConnection,
    request: CreatePaymentRequest,
) -> Result<payment::Model, RepositoryError> {
    debug!(
        "Recording payment of {} toward invoice {}",
        request.amount, request.invoice_id
    );
    check_decimal_precision("amount", request.amount, AMOUNT_MAX_DIGITS, AMOUNT_DECIMAL_PLACES)?;

    // Validate that the invoice exists
    if invoice::Entity::find_by_id(request.invoice_id).one(db).await?.is_none() {
        warn!(
            "Attempted to record payment for non-existent invoice_id: {}",
            request.invoice_id
        );
        return Err(RepositoryError::InvalidReference(format!(
            "invoice with id {} does not exist",
            request.invoice_id
        )));
    }

    let new_payment = payment::ActiveModel {
        invoice_id: Set(request.invoice_id),
        amount: Set(request.amount),
        paid_on: Set(today()),
        ..Default::default()
    };

    let payment_model = new_payment.insert(db).await?;
    info!("Payment created with id {}", payment_model.id);
    Ok(payment_model)
}

/// Get a payment by id.
pub async fn get(db: &DatabaseConnection, id: i32) -> Result<payment::Model, RepositoryError> {
    payment::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(RepositoryError::NotFound { entity: "payment", id })
}

/// List all payments.
pub async fn list(db: &DatabaseConnection) -> Result<Vec<payment::Model>, RepositoryError> {
    Ok(payment::Entity::find().all(db).await?)
}

/// List the payments recorded against an invoice.
pub async fn list_for_invoice(
    db: &DatabaseConnection,
    invoice_id: i32,
) -> Result<Vec<payment::Model>, RepositoryError> {
    Ok(payment::Entity::find()
        .filter(payment::Column::InvoiceId.eq(invoice_id))
        .all(db)
        .await?)
}

/// Delete a payment.
#[instrument(skip(db))]
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), RepositoryError> {
    let result = payment::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        warn!("Payment {} not found for deletion", id);
        return Err(RepositoryError::NotFound { entity: "payment", id });
    }

    info!("Payment {} deleted", id);
    Ok(())
}
