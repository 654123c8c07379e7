use actix_web::{web, HttpResponse};

use crate::{database::MongoDB, services::user_service};

/// POST /users - Ungated: profiles are created at signup, before a token exists
pub async fn create_user(
    db: web::Data<MongoDB>,
    body: web::Json<serde_json::Value>,
) -> HttpResponse {
    log::info!("👤 POST /users");

    let user = match mongodb::bson::to_document(&body.into_inner()) {
        Ok(user) => user,
        Err(e) => {
            log::warn!("❌ Invalid user payload: {}", e);
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Invalid user payload"
            }));
        }
    };

    match user_service::create_user(&db, user).await {
        Ok(inserted_id) => HttpResponse::Created().json(serde_json::json!({
            "insertedId": inserted_id
        })),
        Err(e) => {
            log::error!("❌ Error creating user: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Failed to create user"
            }))
        }
    }
}
