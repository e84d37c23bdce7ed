use worker::*;

use crate::config::Config;
use crate::error::AppError;
use crate::provider::fetch::fetch_with_timeout;
use crate::utils::cors::CorsPolicy;

const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";

const CHROME_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyTargetError {
    Missing,
    Invalid,
}

impl ProxyTargetError {
    fn message(&self) -> &'static str {
        match self {
            ProxyTargetError::Missing => "Missing url query parameter",
            ProxyTargetError::Invalid => "Invalid url query parameter",
        }
    }
}

/// Reads the `url` query parameter. Only absolute http(s) targets are accepted.
pub fn proxy_target(request_url: &Url) -> std::result::Result<Url, ProxyTargetError> {
    let raw = request_url
        .query_pairs()
        .find(|(k, _)| k == "url")
        .map(|(_, v)| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ProxyTargetError::Missing)?;

    let target = Url::parse(&raw).map_err(|_| ProxyTargetError::Invalid)?;
    if matches!(target.scheme(), "http" | "https") {
        Ok(target)
    } else {
        Err(ProxyTargetError::Invalid)
    }
}

/// Plain-text error, readable cross-origin.
fn text_error(message: &str, status: u16, cors: &CorsPolicy) -> Result<Response> {
    let resp = Response::error(message, status)?;
    cors.apply_origin(resp.headers())?;
    Ok(resp)
}

/// Upstream headers with our `Access-Control-Allow-Origin` in place of any the
/// upstream sent. Everything else, `Content-Type` included, is kept as-is.
pub fn merge_cors_origin<I>(upstream: I, cors: &CorsPolicy) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut merged: Vec<(String, String)> = upstream
        .into_iter()
        .filter(|(name, _)| !name.eq_ignore_ascii_case(ALLOW_ORIGIN))
        .collect();
    merged.push((ALLOW_ORIGIN.to_string(), cors.allow_origin().to_string()));
    merged
}

/// Response headers from `fetch` are immutable, so the merged set is copied
/// into a fresh `Headers`.
fn proxied_headers(upstream: &Headers, cors: &CorsPolicy) -> Result<Headers> {
    let headers = Headers::new();
    for (name, value) in merge_cors_origin(upstream.entries(), cors) {
        headers.append(&name, &value)?;
    }
    Ok(headers)
}

fn build_request(target: &Url, referer: &str) -> Result<Request> {
    let headers = Headers::new();
    headers.set("User-Agent", CHROME_UA)?;
    headers.set("Accept", "image/avif,image/webp,image/*,video/*,*/*;q=0.8")?;
    // Instagram's CDN rejects hotlinks without a matching Referer
    headers.set("Referer", referer)?;

    let mut init = RequestInit::new();
    init.with_method(Method::Get).with_headers(headers);

    Request::new_with_init(target.as_str(), &init)
}

/// Media proxy: `GET /image-proxy?url=<target>`.
///
/// Streams the target back with its own status, headers and body, plus
/// `Access-Control-Allow-Origin`.
pub async fn handle(req: Request, config: &Config) -> Result<Response> {
    let cors = config.cors();

    match proxy(&req, config, &cors).await {
        Ok(resp) => Ok(resp),
        Err(e) => {
            console_error!("[image-proxy] internal error: {}", e);
            text_error("Internal error", 500, &cors)
        }
    }
}

async fn proxy(req: &Request, config: &Config, cors: &CorsPolicy) -> Result<Response> {
    let req_url = req.url()?;

    let target = match proxy_target(&req_url) {
        Ok(target) => target,
        Err(e) => {
            console_log!("[image-proxy] rejected: {}", e.message());
            return text_error(e.message(), 400, cors);
        }
    };

    console_log!("[image-proxy] fetching {}", target);
    let request = build_request(&target, &config.proxy_referer)?;

    match fetch_with_timeout(request, config.timeout_ms).await {
        Ok(resp) => {
            let content_type = resp.headers().get("Content-Type")?.unwrap_or_default();
            console_log!(
                "[image-proxy] status={} content-type={}",
                resp.status_code(),
                content_type
            );
            let headers = proxied_headers(resp.headers(), cors)?;
            Ok(resp.with_headers(headers))
        }
        Err(AppError::Timeout { millis }) => {
            console_error!("[image-proxy] timed out after {}ms: {}", millis, target);
            text_error("Image request timed out", 504, cors)
        }
        Err(e) => {
            console_error!("[image-proxy] fetch failed for {}: {}", target, e);
            text_error("Failed to fetch image", 502, cors)
        }
    }
}
