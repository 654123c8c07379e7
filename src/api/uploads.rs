use actix_multipart::Multipart;
use actix_web::HttpResponse;
use futures::TryStreamExt;

use crate::services::imgbb_service;

// The image host rejects files over 32 MB; stop buffering well before that
const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// POST /upload-image - multipart form with an `image` file field.
/// The file is forwarded to the external image host, never stored locally.
pub async fn upload_image(mut payload: Multipart) -> HttpResponse {
    let mut image: Option<(Vec<u8>, Option<String>)> = None;

    loop {
        let mut field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                log::warn!("❌ Invalid multipart payload: {}", e);
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "message": "Invalid multipart payload"
                }));
            }
        };

        if field.name() != Some("image") {
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(|name| name.to_string());

        let mut data = Vec::new();
        loop {
            match field.try_next().await {
                Ok(Some(chunk)) => {
                    if data.len() + chunk.len() > MAX_IMAGE_BYTES {
                        return HttpResponse::PayloadTooLarge().json(serde_json::json!({
                            "message": "Image exceeds the size limit"
                        }));
                    }
                    data.extend_from_slice(&chunk);
                }
                Ok(None) => break,
                Err(e) => {
                    log::warn!("❌ Failed to read image field: {}", e);
                    return HttpResponse::BadRequest().json(serde_json::json!({
                        "message": "Invalid multipart payload"
                    }));
                }
            }
        }

        image = Some((data, filename));
        break;
    }

    let (bytes, filename) = match image {
        Some((bytes, filename)) if !bytes.is_empty() => (bytes, filename),
        _ => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "No image file provided"
            }));
        }
    };

    match imgbb_service::upload_image(&bytes, filename.as_deref()).await {
        Ok(image_url) => HttpResponse::Ok().json(serde_json::json!({
            "imageUrl": image_url
        })),
        Err(e) => {
            log::error!("❌ Image upload failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};

    const BOUNDARY: &str = "abbc761f78ff4d7cb7573b5a23f96ef0";

    fn multipart_body(field_name: &str, bytes: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"parcel.png\"\r\n\
                 Content-Type: image/png\r\n\r\n",
                field_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    async fn upload_status(body: Vec<u8>) -> StatusCode {
        let app = test::init_service(
            App::new().route("/upload-image", web::post().to(upload_image)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/upload-image")
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(body)
            .to_request();

        test::call_service(&app, req).await.status()
    }

    #[actix_web::test]
    async fn test_missing_image_field_is_bad_request() {
        let body = multipart_body("avatar", b"not the expected field");
        assert_eq!(upload_status(body).await, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_empty_image_is_bad_request() {
        let body = multipart_body("image", b"");
        assert_eq!(upload_status(body).await, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_oversized_image_is_rejected_before_forwarding() {
        let body = multipart_body("image", &vec![0u8; MAX_IMAGE_BYTES + 1]);
        assert_eq!(upload_status(body).await, StatusCode::PAYLOAD_TOO_LARGE);
    }
}
