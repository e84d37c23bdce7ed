use thiserror::Error;
use url::Url;
use worker::Env;

use crate::utils::cors::CorsPolicy;

/// Secret holding the provider API key.
pub const API_KEY_SECRET: &str = "INSTA_API_KEY";

const DEFAULT_PROVIDER_URL: &str = "https://api.example.com/download";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const MAX_TIMEOUT_MS: u64 = 120_000;
const DEFAULT_PROXY_REFERER: &str = "https://www.instagram.com/";

/// How the provider authenticates us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// `X-RapidAPI-Key` + `X-RapidAPI-Host`
    RapidApi,
}

impl Provider {
    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "bearer" => Some(Self::Bearer),
            "rapidapi" => Some(Self::RapidApi),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bearer => "bearer",
            Self::RapidApi => "rapidapi",
        }
    }

    fn default_request_style(&self) -> RequestStyle {
        match self {
            Self::Bearer => RequestStyle::Json,
            Self::RapidApi => RequestStyle::Query,
        }
    }
}

/// How the Instagram URL travels to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStyle {
    /// `POST` with `{"url": ...}` as the body.
    Json,
    /// `GET` with `?url=...` appended to the endpoint.
    Query,
}

impl RequestStyle {
    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "query" => Some(Self::Query),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("INSTA_API_KEY is not set")]
    MissingApiKey,
    #[error("unknown PROVIDER {0:?} (expected \"bearer\" or \"rapidapi\")")]
    UnknownProvider(String),
    #[error("unknown PROVIDER_REQUEST {0:?} (expected \"json\" or \"query\")")]
    UnknownRequestStyle(String),
    #[error("{name} is not an http(s) URL: {value:?}")]
    InvalidUrl { name: &'static str, value: String },
    #[error("UPSTREAM_TIMEOUT_MS must be between 1 and 120000, got {0:?}")]
    InvalidTimeout(String),
}

/// Per-invocation settings read from the Worker environment.
#[derive(Clone)]
pub struct Config {
    api_key: Option<String>,
    pub provider: Provider,
    pub provider_url: Url,
    pub request_style: RequestStyle,
    /// Only set for [`Provider::RapidApi`].
    pub rapidapi_host: Option<String>,
    pub timeout_ms: u64,
    pub proxy_referer: String,
    pub allowed_origin: String,
}

impl Config {
    pub fn from_env(env: &Env) -> Result<Self, ConfigError> {
        Self::from_lookup(|name| {
            if name == API_KEY_SECRET {
                env.secret(name).ok().map(|s| s.to_string())
            } else {
                env.var(name).ok().map(|v| v.to_string())
            }
        })
    }

    /// Builds the config from a name -> value lookup.
    ///
    /// Values are trimmed and blank values count as unset. A missing API key
    /// is not an error here: it is reported per request by [`Config::api_key`]
    /// so preflight and the image proxy keep working.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let provider = match get("PROVIDER") {
            Some(raw) => Provider::parse(&raw).ok_or(ConfigError::UnknownProvider(raw))?,
            None => Provider::Bearer,
        };

        let provider_url = parse_http_url(
            "PROVIDER_URL",
            get("PROVIDER_URL").as_deref().unwrap_or(DEFAULT_PROVIDER_URL),
        )?;

        let request_style = match get("PROVIDER_REQUEST") {
            Some(raw) => RequestStyle::parse(&raw).ok_or(ConfigError::UnknownRequestStyle(raw))?,
            None => provider.default_request_style(),
        };

        // http(s) URLs always carry a host
        let rapidapi_host = match provider {
            Provider::Bearer => None,
            Provider::RapidApi => Some(
                get("RAPIDAPI_HOST")
                    .unwrap_or_else(|| provider_url.host_str().unwrap_or_default().to_string()),
            ),
        };

        let timeout_ms = match get("UPSTREAM_TIMEOUT_MS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(ms) if (1..=MAX_TIMEOUT_MS).contains(&ms) => ms,
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => DEFAULT_TIMEOUT_MS,
        };

        let proxy_referer = parse_http_url(
            "PROXY_REFERER",
            get("PROXY_REFERER").as_deref().unwrap_or(DEFAULT_PROXY_REFERER),
        )?
        .to_string();

        Ok(Self {
            api_key: get(API_KEY_SECRET),
            provider,
            provider_url,
            request_style,
            rapidapi_host,
            timeout_ms,
            proxy_referer,
            allowed_origin: get("ALLOWED_ORIGIN").unwrap_or_else(|| CorsPolicy::ANY_ORIGIN.to_string()),
        })
    }

    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }

    pub fn cors(&self) -> CorsPolicy {
        CorsPolicy::new(&self.allowed_origin)
    }
}

fn parse_http_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    let invalid = || ConfigError::InvalidUrl {
        name,
        value: value.to_string(),
    };
    let url = Url::parse(value).map_err(|_| invalid())?;
    if matches!(url.scheme(), "http" | "https") {
        Ok(url)
    } else {
        Err(invalid())
    }
}
