use url::Url;

pub const DEFAULT_ORIGIN_URL: &str = "https://www.nseindia.com";
pub const DEFAULT_LANDING_URL: &str = "https://www.nseindia.com/option-chain";
pub const DEFAULT_API_URL: &str = "https://www.nseindia.com/api/option-chain-indices?symbol=NIFTY";

/// URLs involved in one polling session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NseEndpoints {
    /// Site root, visited first to obtain the base session cookies.
    pub origin_url: String,
    /// Page that triggers issuance of the anti-bot cookies. Also sent as
    /// `Referer` on API calls.
    pub landing_url: String,
    /// JSON option-chain endpoint.
    pub api_url: String,
}

impl Default for NseEndpoints {
    fn default() -> Self {
        Self {
            origin_url: DEFAULT_ORIGIN_URL.to_string(),
            landing_url: DEFAULT_LANDING_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl NseEndpoints {
    /// Check that every URL is an absolute http(s) URL.
    ///
    /// Returns the offending URL and reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        for raw in [&self.origin_url, &self.landing_url, &self.api_url] {
            let url = Url::parse(raw).map_err(|e| format!("invalid url '{}': {}", raw, e))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(format!("unsupported scheme in '{}'", raw));
            }
        }
        Ok(())
    }
}
