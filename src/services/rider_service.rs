use crate::database::MongoDB;
use mongodb::bson::Document;

/// POST /riders - Stores a delivery-rider application exactly as submitted
pub async fn create_rider(db: &MongoDB, rider: Document) -> Result<String, String> {
    let collection = db.collection::<Document>("riders");

    let result = collection
        .insert_one(rider)
        .await
        .map_err(|e| format!("Database error: {}", e))?;

    let inserted_id = result
        .inserted_id
        .as_object_id()
        .map(|oid| oid.to_hex())
        .unwrap_or_else(|| result.inserted_id.to_string());

    log::info!("✅ Rider application created: {}", inserted_id);

    Ok(inserted_id)
}
