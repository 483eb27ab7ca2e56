use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{Instrument, debug, info_span};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Tags every request with an id (the caller's `x-request-id` or a fresh UUID),
/// runs it inside an `http_request` span and echoes the id on the response.
pub async fn inject_request_id(mut req: Request, next: Next) -> Response {
    let incoming = req
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let id = incoming.unwrap_or_else(|| Uuid::new_v4().to_string());

    let header = HeaderValue::from_str(&id).ok();
    if let Some(val) = &header {
        req.headers_mut().insert(REQUEST_ID_HEADER, val.clone());
    }

    let span = info_span!(
        "http_request",
        trace_id = %id,
        method = %req.method(),
        path = %req.uri().path()
    );

    let mut resp = async move {
        let resp = next.run(req).await;
        debug!(status = %resp.status(), "request finished");
        resp
    }
    .instrument(span)
    .await;

    if let Some(val) = header {
        resp.headers_mut().insert(REQUEST_ID_HEADER, val);
    }
    resp
}
