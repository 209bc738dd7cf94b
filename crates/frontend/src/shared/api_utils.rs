//! API utilities for frontend-backend communication
//!
//! Provides helper functions for constructing API and WebSocket URLs.

/// Get the base URL for API requests
///
/// The client is served by the same process that exposes the API, so the
/// base is simply the current origin.
///
/// # Returns
/// - Origin like "http://localhost:5000" or "https://example.com"
/// - Empty string if window is not available
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    window.location().origin().unwrap_or_default()
}

/// Build a full API URL from a path
///
/// # Example
/// ```rust,no_run
/// use frontend::shared::api_utils::api_url;
/// let url = api_url("/api/login");
/// ```
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// Build a WebSocket URL from a path
///
/// The scheme follows the page: `https:` pages get `wss:`, everything else
/// gets `ws:`.
pub fn ws_url(path: &str) -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let host = location.host().unwrap_or_else(|_| "127.0.0.1".to_string());
    let scheme = if protocol == "https:" { "wss" } else { "ws" };
    format!("{}://{}{}", scheme, host, path)
}
