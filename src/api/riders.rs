use actix_web::{web, HttpResponse};

use crate::{
    database::MongoDB,
    services::{rider_service, token_service::Claims},
};

/// 🔒 POST /riders - Delivery-rider application, stored as submitted
pub async fn create_rider(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    body: web::Json<serde_json::Value>,
) -> HttpResponse {
    log::info!("🛵 POST /riders - sub: {}", user.sub);

    let rider = match mongodb::bson::to_document(&body.into_inner()) {
        Ok(rider) => rider,
        Err(e) => {
            log::warn!("❌ Invalid rider payload: {}", e);
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Invalid rider payload"
            }));
        }
    };

    match rider_service::create_rider(&db, rider).await {
        Ok(inserted_id) => HttpResponse::Created().json(serde_json::json!({
            "insertedId": inserted_id
        })),
        Err(e) => {
            log::error!("❌ Error creating rider: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Failed to create rider"
            }))
        }
    }
}
