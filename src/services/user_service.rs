use crate::database::MongoDB;
use mongodb::bson::Document;

/// POST /users - Stores a profile exactly as submitted
pub async fn create_user(db: &MongoDB, user: Document) -> Result<String, String> {
    let collection = db.collection::<Document>("users");

    let result = collection
        .insert_one(user)
        .await
        .map_err(|e| format!("Database error: {}", e))?;

    let inserted_id = result
        .inserted_id
        .as_object_id()
        .map(|oid| oid.to_hex())
        .unwrap_or_else(|| result.inserted_id.to_string());

    log::info!("✅ User profile created: {}", inserted_id);

    Ok(inserted_id)
}
