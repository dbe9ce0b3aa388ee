//! Expose process metrics for scraping.
use actix_web::error::ErrorInternalServerError;
use actix_web::web::Data;
use actix_web::HttpResponse;
use prometheus::Encoder;
use prometheus::TextEncoder;

/// Render all registered metrics in the prometheus text format.
#[actix_web::get("/metrics")]
pub async fn metrics(registry: Data<prometheus::Registry>) -> actix_web::Result<HttpResponse> {
    let encoder = TextEncoder::new();
    let families = registry.gather();
    let mut body = Vec::new();
    encoder
        .encode(&families, &mut body)
        .map_err(ErrorInternalServerError)?;
    let response = HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(body);
    Ok(response)
}
