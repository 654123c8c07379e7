use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::services::token_service;

pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    // Rc so the inner service can be moved into the verification future
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            // Missing credential fails before the verifier is ever called
            let header = match req.headers().get("Authorization") {
                Some(header) => header,
                None => {
                    return Err(actix_web::error::ErrorUnauthorized(
                        "Missing authorization token",
                    ))
                }
            };

            let token = header
                .to_str()
                .ok()
                .and_then(|value| value.strip_prefix("Bearer "));

            let token = match token {
                Some(token) => token,
                None => {
                    return Err(actix_web::error::ErrorUnauthorized(
                        "Invalid token format",
                    ))
                }
            };

            match token_service::verify_id_token(token).await {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                    service.call(req).await
                }
                Err(e) => {
                    log::warn!("🚫 Token rejected: {}", e);
                    Err(actix_web::error::ErrorForbidden("Forbidden access"))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, HttpResponse};
    use base64::Engine;

    async fn gated_handler() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    async fn gate_status(req: test::TestRequest) -> StatusCode {
        let app = test::init_service(
            App::new().service(
                web::scope("/gated")
                    .wrap(AuthMiddleware)
                    .route("", web::get().to(gated_handler)),
            ),
        )
        .await;

        match test::try_call_service(&app, req.uri("/gated").to_request()).await {
            Ok(response) => response.status(),
            Err(e) => e.as_response_error().status_code(),
        }
    }

    #[actix_web::test]
    async fn test_missing_header_is_unauthorized() {
        let status = gate_status(test::TestRequest::get()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_non_bearer_header_is_unauthorized() {
        let req = test::TestRequest::get().insert_header(("Authorization", "Basic dXNlcjpwdw=="));
        assert_eq!(gate_status(req).await, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_garbage_token_is_forbidden() {
        // Verification fails at header decoding, before any network call
        let blob = base64::engine::general_purpose::STANDARD
            .encode(r#"{"type":"service_account","project_id":"parcel-demo"}"#);
        std::env::set_var("FB_SERVICE_KEY", &blob);

        let req = test::TestRequest::get().insert_header(("Authorization", "Bearer not-a-jwt"));
        assert_eq!(gate_status(req).await, StatusCode::FORBIDDEN);
    }
}
