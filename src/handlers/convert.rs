use worker::*;

use super::{error_response, json_response};
use crate::config::Config;
use crate::error::AppError;
use crate::provider::fetch_media;
use crate::utils::instagram::{canonical_post_url, extract_post_id};

/// Pulls the Instagram URL out of a `{"url": "..."}` body.
///
/// Invalid JSON, a non-object body, a missing or non-string `url` and a blank
/// `url` are all the same caller mistake.
pub fn parse_convert_body(body: &str) -> std::result::Result<String, AppError> {
    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|_| AppError::MissingInstagramUrl)?;

    json.get("url")
        .and_then(|u| u.as_str())
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(String::from)
        .ok_or(AppError::MissingInstagramUrl)
}

/// Conversion route: `POST /` with `{"url": "<instagram url>"}`.
pub async fn handle(mut req: Request, config: &Config) -> Result<Response> {
    let cors = config.cors();

    match convert(&mut req, config).await {
        Ok(body) => json_response(body, 200, &cors),
        Err(err) => {
            console_error!("[convert] {} -> {}", err, err.status());
            error_response(&err, &cors)
        }
    }
}

/// Checks the request against the config: key first, then the body.
///
/// Returns the API key and the canonical Instagram URL to forward.
pub fn prepare<'c>(
    config: &'c Config,
    body: &str,
) -> std::result::Result<(&'c str, String), AppError> {
    let api_key = config.api_key()?;
    let instagram_url = canonical_post_url(&parse_convert_body(body)?);
    Ok((api_key, instagram_url))
}

async fn convert(req: &mut Request, config: &Config) -> std::result::Result<String, AppError> {
    // An unreadable body is handled like an empty one.
    let body = req.text().await.unwrap_or_default();
    let (api_key, instagram_url) = prepare(config, &body)?;

    let post_id = url::Url::parse(&instagram_url)
        .ok()
        .and_then(|u| extract_post_id(u.path()).map(String::from));
    console_log!(
        "[convert] url={} post_id={}",
        instagram_url,
        post_id.as_deref().unwrap_or("-")
    );

    fetch_media(config, api_key, &instagram_url).await
}
