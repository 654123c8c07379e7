// ==================== PARCEL BOOKINGS ====================
// Parcels are client-defined documents: the frontend owns the field set,
// the server only guarantees `_id` and the payment_status transition.

use crate::{database::MongoDB, utils::error::AppError};
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};

/// Replaces the BSON ObjectId `_id` with its hex string so documents
/// serialize to plain JSON for the frontend.
fn stringify_id(mut document: Document) -> Document {
    if let Ok(oid) = document.get_object_id("_id") {
        document.insert("_id", oid.to_hex());
    }
    document
}

/// POST /parcels - Stores a booking exactly as submitted
pub async fn create_parcel(db: &MongoDB, parcel: Document) -> Result<String, String> {
    let collection = db.collection::<Document>("parcels");

    let result = collection
        .insert_one(parcel)
        .await
        .map_err(|e| format!("Database error: {}", e))?;

    let inserted_id = result
        .inserted_id
        .as_object_id()
        .map(|oid| oid.to_hex())
        .unwrap_or_else(|| result.inserted_id.to_string());

    log::info!("✅ Parcel created: {}", inserted_id);

    Ok(inserted_id)
}

/// GET /parcels - Lists bookings, optionally restricted to one creator,
/// newest first
pub async fn list_parcels(
    db: &MongoDB,
    email: Option<&str>,
) -> Result<Vec<Document>, String> {
    let collection = db.collection::<Document>("parcels");

    let filter = match email {
        Some(email) => doc! { "created_by": email },
        None => doc! {},
    };

    let mut cursor = collection
        .find(filter)
        .sort(doc! { "createdAt": -1 })
        .await
        .map_err(|e| format!("Database error: {}", e))?;

    let mut parcels = Vec::new();
    while let Some(parcel) = cursor.next().await {
        let parcel = parcel.map_err(|e| format!("Database error: {}", e))?;
        parcels.push(stringify_id(parcel));
    }

    Ok(parcels)
}

/// GET /parcels/{id} - Fetches one booking by identifier
pub async fn get_parcel(db: &MongoDB, id: &str) -> Result<Document, AppError> {
    // A malformed id can never match a stored document
    let oid = ObjectId::parse_str(id)
        .map_err(|_| AppError::NotFound(format!("Parcel not found: {}", id)))?;

    let collection = db.collection::<Document>("parcels");

    let parcel = collection
        .find_one(doc! { "_id": oid })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound(format!("Parcel not found: {}", id)))?;

    Ok(stringify_id(parcel))
}

/// DELETE /parcels/{id} - Removes one booking, reporting how many matched
pub async fn delete_parcel(db: &MongoDB, id: &str) -> Result<u64, String> {
    let oid = match ObjectId::parse_str(id) {
        Ok(oid) => oid,
        Err(_) => return Ok(0),
    };

    let collection = db.collection::<Document>("parcels");

    let result = collection
        .delete_one(doc! { "_id": oid })
        .await
        .map_err(|e| format!("Database error: {}", e))?;

    log::info!("🗑️  Parcel {} delete: {} removed", id, result.deleted_count);

    Ok(result.deleted_count)
}
