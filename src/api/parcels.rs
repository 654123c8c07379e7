use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::{
    database::MongoDB,
    services::{parcel_service, token_service::Claims},
    utils::error::AppError,
};

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

/// 🔒 POST /parcels
/// Body is a client-defined booking document, stored as-is
pub async fn create_parcel(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    body: web::Json<serde_json::Value>,
) -> HttpResponse {
    log::info!("📦 POST /parcels - sub: {}", user.sub);

    let parcel = match mongodb::bson::to_document(&body.into_inner()) {
        Ok(parcel) => parcel,
        Err(e) => {
            log::warn!("❌ Invalid parcel payload: {}", e);
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Invalid parcel payload"
            }));
        }
    };

    match parcel_service::create_parcel(&db, parcel).await {
        Ok(inserted_id) => HttpResponse::Created().json(serde_json::json!({
            "insertedId": inserted_id
        })),
        Err(e) => {
            log::error!("❌ Error creating parcel: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Failed to create parcel"
            }))
        }
    }
}

#[utoipa::path(
    get,
    path = "/parcels",
    tag = "Parcels",
    params(
        ("email" = Option<String>, Query, description = "Filter by creator email")
    ),
    responses(
        (status = 200, description = "Parcels, newest first"),
        (status = 401, description = "Missing credential"),
        (status = 403, description = "Invalid credential")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_parcels(
    db: web::Data<MongoDB>,
    query: web::Query<EmailQuery>,
) -> HttpResponse {
    match parcel_service::list_parcels(&db, query.email.as_deref()).await {
        Ok(parcels) => HttpResponse::Ok().json(parcels),
        Err(e) => {
            log::error!("❌ Error listing parcels: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Failed to list parcels"
            }))
        }
    }
}

#[utoipa::path(
    get,
    path = "/parcels/{id}",
    tag = "Parcels",
    params(("id" = String, Path, description = "Parcel identifier")),
    responses(
        (status = 200, description = "Parcel document"),
        (status = 404, description = "No parcel with this id")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_parcel(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> HttpResponse {
    let id = path.into_inner();

    match parcel_service::get_parcel(&db, &id).await {
        Ok(parcel) => HttpResponse::Ok().json(parcel),
        Err(AppError::NotFound(msg)) => {
            log::warn!("⚠️ {}", msg);
            HttpResponse::NotFound().json(serde_json::json!({
                "message": "Parcel not found"
            }))
        }
        Err(e) => {
            log::error!("❌ Error fetching parcel {}: {}", id, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Failed to fetch parcel"
            }))
        }
    }
}

/// 🔒 DELETE /parcels/{id}
/// Reports the deletion count even when nothing matched
pub async fn delete_parcel(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> HttpResponse {
    let id = path.into_inner();

    match parcel_service::delete_parcel(&db, &id).await {
        Ok(deleted_count) => HttpResponse::Ok().json(serde_json::json!({
            "deletedCount": deleted_count
        })),
        Err(e) => {
            log::error!("❌ Error deleting parcel {}: {}", id, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Failed to delete parcel"
            }))
        }
    }
}
