//! Configuration module
//!
//! Environment-driven configuration for the client: backend base URL, the
//! application origin used for share links, and gallery paging defaults.

use std::env;

/// Items per gallery page. The backend returns the full collection; the
/// client windows it into fixed-size pages.
pub const DEFAULT_PAGE_SIZE: usize = 9;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_APP_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Client configuration
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the StickGen backend API
    pub api_base_url: String,
    /// Origin of the web application, used to build share links
    pub app_origin: String,
    /// Gallery page size (items per window)
    pub page_size: usize,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            app_origin: DEFAULT_APP_ORIGIN.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Load configuration from the environment, falling back to defaults.
    ///
    /// Recognized variables: STICKGEN_API_URL, STICKGEN_APP_ORIGIN,
    /// STICKGEN_PAGE_SIZE, STICKGEN_REQUEST_TIMEOUT_SECS.
    pub fn from_env() -> Self {
        let api_base_url = env::var("STICKGEN_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let app_origin = env::var("STICKGEN_APP_ORIGIN")
            .unwrap_or_else(|_| DEFAULT_APP_ORIGIN.to_string())
            .trim_end_matches('/')
            .to_string();

        let page_size = env::var("STICKGEN_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let request_timeout_secs = env::var("STICKGEN_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Self {
            api_base_url,
            app_origin,
            page_size,
            request_timeout_secs,
        }
    }
}
