use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Parcel Delivery Service API",
        version = "1.0.0",
        description = "Parcel-delivery booking backend. \n\n**Authentication:** gated endpoints require a Bearer ID token issued by the identity provider.\n\n**Features:**\n- Parcel booking CRUD\n- Two-step card payments (intent + record)\n- Rider applications\n- Image hosting passthrough",
        contact(
            name = "Parcel Delivery Team",
            email = "support@parcel-delivery.example.com"
        )
    ),
    paths(
        // Health
        crate::api::health::health_check,

        // Parcels
        crate::api::parcels::list_parcels,
        crate::api::parcels::get_parcel,

        // Payments
        crate::api::payments::create_payment_intent,
        crate::api::payments::record_payment,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::api::payments::CreateIntentRequest,
            crate::api::payments::CreateIntentResponse,
            crate::services::payment_service::RecordPaymentRequest,
            crate::services::payment_service::RecordPaymentResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and health endpoints for platform probes."),
        (name = "Parcels", description = "Parcel booking endpoints. Bookings are owned by their creator's email."),
        (name = "Payments", description = "Payment endpoints. Intents are confirmed client-side; confirmations are recorded here.")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Identity provider ID token"))
                        .build(),
                ),
            );
        }
    }
}
