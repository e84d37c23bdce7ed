use worker::*;

pub const ALLOW_METHODS: &str = "POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type";

/// Cross-origin headers attached to responses read by the frontend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsPolicy {
    allow_origin: String,
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self::new(Self::ANY_ORIGIN)
    }
}

impl CorsPolicy {
    pub const ANY_ORIGIN: &'static str = "*";

    pub fn new(allow_origin: &str) -> Self {
        Self {
            allow_origin: allow_origin.to_string(),
        }
    }

    pub fn allow_origin(&self) -> &str {
        &self.allow_origin
    }

    pub fn header_pairs(&self) -> [(&'static str, &str); 3] {
        [
            ("Access-Control-Allow-Origin", self.allow_origin.as_str()),
            ("Access-Control-Allow-Methods", ALLOW_METHODS),
            ("Access-Control-Allow-Headers", ALLOW_HEADERS),
        ]
    }

    pub fn apply(&self, headers: &Headers) -> Result<()> {
        for (name, value) in self.header_pairs() {
            headers.set(name, value)?;
        }
        Ok(())
    }

    /// Sets only `Access-Control-Allow-Origin`, leaving other headers alone.
    pub fn apply_origin(&self, headers: &Headers) -> Result<()> {
        headers.set("Access-Control-Allow-Origin", self.allow_origin())
    }

    /// Headers of every JSON response on the conversion route.
    pub fn json_header_pairs(&self) -> [(&'static str, &str); 4] {
        let [origin, methods, headers] = self.header_pairs();
        [origin, methods, headers, ("Content-Type", "application/json")]
    }

    pub fn json_headers(&self) -> Result<Headers> {
        let headers = Headers::new();
        for (name, value) in self.json_header_pairs() {
            headers.set(name, value)?;
        }
        Ok(headers)
    }
}
