use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::{
    database::MongoDB,
    services::{
        payment_service::{self, RecordPaymentRequest},
        stripe_service,
        token_service::Claims,
    },
    utils::error::AppError,
};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateIntentRequest {
    #[serde(rename = "amountInCents")]
    pub amount_in_cents: i64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CreateIntentResponse {
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

#[utoipa::path(
    post,
    path = "/create-payment-intent",
    tag = "Payments",
    request_body = CreateIntentRequest,
    responses(
        (status = 200, description = "Client confirmation secret", body = CreateIntentResponse),
        (status = 500, description = "Gateway error")
    )
)]
pub async fn create_payment_intent(
    request: web::Json<CreateIntentRequest>,
) -> HttpResponse {
    log::info!("💳 POST /create-payment-intent - {} cents", request.amount_in_cents);

    match stripe_service::create_payment_intent(request.amount_in_cents).await {
        Ok(intent) => HttpResponse::Ok().json(CreateIntentResponse {
            client_secret: intent.client_secret,
        }),
        Err(e) => {
            log::error!("❌ Payment intent failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e
            }))
        }
    }
}

#[utoipa::path(
    post,
    path = "/payments",
    tag = "Payments",
    request_body = RecordPaymentRequest,
    responses(
        (status = 201, description = "Payment recorded", body = payment_service::RecordPaymentResponse),
        (status = 404, description = "No parcel with this id"),
        (status = 409, description = "Parcel is already paid"),
        (status = 500, description = "Store error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn record_payment(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<RecordPaymentRequest>,
) -> HttpResponse {
    log::info!(
        "💳 POST /payments - parcel {} by sub {}",
        request.parcel_id,
        user.sub
    );

    match payment_service::record_payment(&db, request.into_inner()).await {
        Ok(response) => HttpResponse::Created().json(response),
        Err(AppError::NotFound(_)) => HttpResponse::NotFound().json(serde_json::json!({
            "message": "Parcel not found"
        })),
        Err(AppError::AlreadyPaid(_)) => HttpResponse::Conflict().json(serde_json::json!({
            "message": "Parcel is already paid"
        })),
        Err(e) => {
            log::error!("❌ Error recording payment: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Failed to record payment"
            }))
        }
    }
}

/// 🔒 GET /payments?email=
/// Payment history, newest paid first
pub async fn list_payments(
    db: web::Data<MongoDB>,
    query: web::Query<EmailQuery>,
) -> HttpResponse {
    match payment_service::list_payments(&db, query.email.as_deref()).await {
        Ok(payments) => HttpResponse::Ok().json(payments),
        Err(e) => {
            log::error!("❌ Error listing payments: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Failed to list payments"
            }))
        }
    }
}
