use crate::error::{ApiError, ValidJson};
use crate::generator;
use crate::models::{ImageRequest, ImageResponse, StatusResponse, TextRequest, TextResponse};
use crate::request_id::inject_request_id;
use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::Uri,
    middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tracing::debug;

pub const SERVICE_NAME: &str = "AI Backend API";

pub fn build_router() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(|| async { "OK" }))
        .route("/api/text", post(generate_text))
        .route("/api/image", post(generate_image))
        .fallback(not_found)
        // Prompts and messages have no length cap
        .layer(DefaultBodyLimit::disable())
        // Mirrors origin, method and headers so credentials can be allowed for any caller
        .layer(CorsLayer::very_permissive())
        // Outermost, so preflight answers carry an id too
        .layer(middleware::from_fn(inject_request_id))
}

pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: format!("{} is running", SERVICE_NAME),
    })
}

#[axum_macros::debug_handler]
pub async fn generate_text(ValidJson(request): ValidJson<TextRequest>) -> Json<TextResponse> {
    debug!("Received text request ({} chars)", request.message.chars().count());
    let response = generator::text_response(&mut rand::thread_rng(), &request.message);
    Json(TextResponse { response })
}

#[axum_macros::debug_handler]
pub async fn generate_image(ValidJson(request): ValidJson<ImageRequest>) -> Json<ImageResponse> {
    debug!("Received image request ({} chars)", request.prompt.chars().count());
    let image_url = generator::image_url(&mut rand::thread_rng(), &request.prompt);
    debug!("Returning image url: {}", image_url);
    Json(ImageResponse { image_url })
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
