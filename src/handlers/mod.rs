pub mod convert;
pub mod image_proxy;

use worker::*;

use crate::error::AppError;
use crate::utils::cors::CorsPolicy;

/// Empty 200 carrying the CORS headers.
pub fn preflight(cors: &CorsPolicy) -> Result<Response> {
    let headers = Headers::new();
    cors.apply(&headers)?;
    Ok(Response::empty()?.with_headers(headers))
}

/// JSON body with the CORS headers attached.
pub fn json_response(body: String, status: u16, cors: &CorsPolicy) -> Result<Response> {
    Ok(Response::ok(body)?
        .with_status(status)
        .with_headers(cors.json_headers()?))
}

pub fn error_response(err: &AppError, cors: &CorsPolicy) -> Result<Response> {
    json_response(err.to_json()?, err.status(), cors)
}
