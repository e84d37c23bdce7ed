pub mod fetch;
pub mod request;
pub mod response;

use worker::*;

use self::fetch::fetch_text_with_timeout;
use self::request::ProviderRequest;
use self::response::interpret;
use crate::config::Config;
use crate::error::AppError;
use crate::utils::preview;

/// Asks the configured provider for the media behind `instagram_url`.
///
/// Returns the provider's JSON body as-is on success.
pub async fn fetch_media(
    config: &Config,
    api_key: &str,
    instagram_url: &str,
) -> std::result::Result<String, AppError> {
    let outbound = ProviderRequest::build(config, api_key, instagram_url);
    let method: &str = outbound.method.as_ref();
    console_log!(
        "[provider] {} {} (auth={}, timeout={}ms)",
        method,
        config.provider_url,
        config.provider.as_str(),
        config.timeout_ms
    );

    let request = outbound.into_worker_request()?;
    let (status, text) = fetch_text_with_timeout(request, config.timeout_ms).await?;
    console_log!("[provider] status={} len={}", status, text.len());

    if !(200..300).contains(&status) {
        console_error!("[provider] error body: {}", preview(&text, 200));
    }

    interpret(status, text)
}
