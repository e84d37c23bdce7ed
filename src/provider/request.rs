use url::Url;
use worker::*;

use crate::config::{Config, Provider, RequestStyle};

/// Outbound call to the provider, described without touching the runtime.
#[derive(Clone)]
pub struct ProviderRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<String>,
}

impl ProviderRequest {
    pub fn build(config: &Config, api_key: &str, instagram_url: &str) -> Self {
        let mut url = config.provider_url.clone();
        let mut headers = vec![("Accept", "application/json".to_string())];

        match config.provider {
            Provider::Bearer => headers.push(("Authorization", format!("Bearer {api_key}"))),
            Provider::RapidApi => {
                headers.push(("X-RapidAPI-Key", api_key.to_string()));
                headers.push((
                    "X-RapidAPI-Host",
                    config.rapidapi_host.clone().unwrap_or_default(),
                ));
            }
        }

        let (method, body) = match config.request_style {
            RequestStyle::Json => {
                headers.push(("Content-Type", "application/json".to_string()));
                let body = serde_json::json!({ "url": instagram_url }).to_string();
                (Method::Post, Some(body))
            }
            RequestStyle::Query => {
                url.query_pairs_mut().append_pair("url", instagram_url);
                (Method::Get, None)
            }
        };

        Self {
            method,
            url,
            headers,
            body,
        }
    }

    pub fn into_worker_request(self) -> Result<Request> {
        let headers = Headers::new();
        for (name, value) in &self.headers {
            headers.set(name, value)?;
        }

        let mut init = RequestInit::new();
        init.with_method(self.method).with_headers(headers);
        if let Some(body) = self.body {
            init.with_body(Some(body.into()));
        }

        Request::new_with_init(self.url.as_str(), &init)
    }
}
