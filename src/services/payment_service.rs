// ==================== PAYMENT WORKFLOW ====================
// Converts a client-submitted gateway confirmation into a parcel status
// transition plus a durable payment record. Both writes happen inside one
// session transaction so a parcel is never marked paid without its record.
//
// Amounts and transaction ids are taken at face value: the gateway is the
// authority on payment correctness, this service only records the outcome.

use crate::{
    database::MongoDB,
    models::Payment,
    utils::error::AppError,
};
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::ClientSession;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RecordPaymentRequest {
    #[serde(rename = "parcelId")]
    pub parcel_id: String,
    pub email: String,
    pub amount: f64,
    #[serde(rename = "paymentMethod")]
    pub payment_method: String,
    #[serde(rename = "transactionId")]
    pub transaction_id: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RecordPaymentResponse {
    pub message: String,
    #[serde(rename = "insertedId")]
    pub inserted_id: String,
}

/// Wire shape for the payment history: plain JSON, no BSON extended types.
/// `Payment` keeps the storage representation; this is what clients see.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PaymentRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "parcelId")]
    pub parcel_id: String,
    pub email: String,
    pub amount: f64,
    #[serde(rename = "paymentMethod")]
    pub payment_method: String,
    #[serde(rename = "transactionId")]
    pub transaction_id: String,
    pub paid_at: String,
    pub paid_at_string: String,
}

impl From<Payment> for PaymentRecord {
    fn from(payment: Payment) -> Self {
        let paid_at = payment
            .paid_at
            .try_to_rfc3339_string()
            .unwrap_or_else(|_| payment.paid_at_string.clone());

        Self {
            id: payment.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            parcel_id: payment.parcel_id,
            email: payment.email,
            amount: payment.amount,
            payment_method: payment.payment_method,
            transaction_id: payment.transaction_id,
            paid_at,
            paid_at_string: payment.paid_at_string,
        }
    }
}

async fn abort_quietly(session: &mut ClientSession) {
    if let Err(e) = session.abort_transaction().await {
        log::warn!("⚠️ Failed to abort payment transaction: {}", e);
    }
}

/// POST /payments - Marks the parcel paid and inserts the payment record.
///
/// The status transition is conditioned on the parcel not already being
/// paid, so a repeated submission matches nothing and is rejected rather
/// than merged. Absent parcel and already-paid parcel are reported as
/// distinct errors (404 vs 409).
pub async fn record_payment(
    db: &MongoDB,
    request: RecordPaymentRequest,
) -> Result<RecordPaymentResponse, AppError> {
    log::info!(
        "💳 Recording payment for parcel {} by {}",
        request.parcel_id,
        request.email
    );

    let oid = ObjectId::parse_str(&request.parcel_id)
        .map_err(|_| AppError::NotFound(format!("Parcel not found: {}", request.parcel_id)))?;

    let parcels = db.collection::<Document>("parcels");
    let payments = db.collection::<Payment>("payments");

    let mut session = db
        .client()
        .start_session()
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    session
        .start_transaction()
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    // 1. Transition payment_status, but only if not already paid
    let update = match parcels
        .update_one(
            doc! { "_id": oid, "payment_status": { "$ne": "paid" } },
            doc! { "$set": { "payment_status": "paid" } },
        )
        .session(&mut session)
        .await
    {
        Ok(update) => update,
        Err(e) => {
            abort_quietly(&mut session).await;
            return Err(AppError::DatabaseError(e.to_string()));
        }
    };

    if update.modified_count == 0 {
        abort_quietly(&mut session).await;

        // Disambiguate: missing parcel vs repeated submission
        let existing = parcels
            .find_one(doc! { "_id": oid })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        return match existing {
            Some(_) => {
                log::warn!("⚠️ Parcel {} is already paid", request.parcel_id);
                Err(AppError::AlreadyPaid(request.parcel_id))
            }
            None => {
                log::warn!("⚠️ Parcel {} not found", request.parcel_id);
                Err(AppError::NotFound(format!(
                    "Parcel not found: {}",
                    request.parcel_id
                )))
            }
        };
    }

    // 2. Insert the payment record in the same transaction
    let payment = Payment::new(
        request.parcel_id.clone(),
        request.email,
        request.amount,
        request.payment_method,
        request.transaction_id,
    );

    let insert = match payments.insert_one(payment).session(&mut session).await {
        Ok(insert) => insert,
        Err(e) => {
            abort_quietly(&mut session).await;
            return Err(AppError::DatabaseError(e.to_string()));
        }
    };

    session
        .commit_transaction()
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    let inserted_id = insert
        .inserted_id
        .as_object_id()
        .map(|oid| oid.to_hex())
        .unwrap_or_else(|| insert.inserted_id.to_string());

    log::info!(
        "✅ Payment {} recorded for parcel {}",
        inserted_id,
        request.parcel_id
    );

    Ok(RecordPaymentResponse {
        message: "Payment recorded successfully".to_string(),
        inserted_id,
    })
}

/// GET /payments - Lists payment records, optionally for one payer,
/// newest paid first
pub async fn list_payments(
    db: &MongoDB,
    email: Option<&str>,
) -> Result<Vec<PaymentRecord>, String> {
    let collection = db.collection::<Payment>("payments");

    let filter = match email {
        Some(email) => doc! { "email": email },
        None => doc! {},
    };

    let mut cursor = collection
        .find(filter)
        .sort(doc! { "paid_at": -1 })
        .await
        .map_err(|e| format!("Database error: {}", e))?;

    let mut payments = Vec::new();
    while let Some(payment) = cursor.next().await {
        let payment = payment.map_err(|e| format!("Database error: {}", e))?;
        payments.push(PaymentRecord::from(payment));
    }

    Ok(payments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_wire_field_names() {
        let body = serde_json::json!({
            "parcelId": "65a1b2c3d4e5f6a7b8c9d0e1",
            "email": "sender@example.com",
            "amount": 1200.0,
            "paymentMethod": "card",
            "transactionId": "pi_3OaXYZ"
        });

        let request: RecordPaymentRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.parcel_id, "65a1b2c3d4e5f6a7b8c9d0e1");
        assert_eq!(request.payment_method, "card");
        assert_eq!(request.transaction_id, "pi_3OaXYZ");
    }

    #[test]
    fn test_listing_shape_is_plain_json() {
        let mut payment = Payment::new(
            "65a1b2c3d4e5f6a7b8c9d0e1".to_string(),
            "sender@example.com".to_string(),
            1200.0,
            "card".to_string(),
            "pi_3OaXYZ".to_string(),
        );
        payment.id = Some(ObjectId::new());
        let hex = payment.id.unwrap().to_hex();

        let json = serde_json::to_value(PaymentRecord::from(payment)).unwrap();

        // No BSON extended JSON on the wire: plain strings only
        assert_eq!(json["_id"], serde_json::Value::String(hex));
        assert_eq!(json["parcelId"], "65a1b2c3d4e5f6a7b8c9d0e1");
        let paid_at = json["paid_at"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(paid_at).is_ok());
    }

    #[tokio::test]
    #[ignore] // Requires a MongoDB replica set (transactions)
    async fn test_payment_workflow_rejects_repeats_and_unknown_parcels() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/parcelDeliveryTest".to_string());
        let db = MongoDB::new(&uri).await.unwrap();

        let parcels = db.collection::<Document>("parcels");
        let inserted = parcels
            .insert_one(doc! {
                "type": "document",
                "created_by": "sender@example.com",
                "createdAt": chrono::Utc::now().to_rfc3339(),
                "payment_status": "unpaid",
            })
            .await
            .unwrap();
        let parcel_id = inserted.inserted_id.as_object_id().unwrap().to_hex();

        let request = |id: &str| RecordPaymentRequest {
            parcel_id: id.to_string(),
            email: "sender@example.com".to_string(),
            amount: 1200.0,
            payment_method: "card".to_string(),
            transaction_id: "pi_test".to_string(),
        };

        // First submission succeeds and flips the status
        let response = record_payment(&db, request(&parcel_id)).await.unwrap();
        assert!(!response.inserted_id.is_empty());

        let parcel = parcels
            .find_one(doc! { "_id": ObjectId::parse_str(&parcel_id).unwrap() })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(parcel.get_str("payment_status").unwrap(), "paid");

        // Second submission is rejected, no extra record
        let second = record_payment(&db, request(&parcel_id)).await;
        assert!(matches!(second, Err(AppError::AlreadyPaid(_))));

        let count = list_payments(&db, Some("sender@example.com"))
            .await
            .unwrap()
            .into_iter()
            .filter(|p| p.parcel_id == parcel_id)
            .count();
        assert_eq!(count, 1);

        // Unknown parcel id is NotFound and writes nothing
        let missing = record_payment(&db, request(&ObjectId::new().to_hex())).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }
}
