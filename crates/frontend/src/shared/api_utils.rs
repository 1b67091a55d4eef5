//! Base URLs for the two services the page talks to
//!
//! - the copilot runtime (`insight_backend`) on port 3000
//! - the insights API, overridable at build time with `INSIGHTS_API_URL`

fn origin_with_port(port: u16) -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:{}", protocol, hostname, port)
}

/// Base URL of the copilot runtime, e.g. "http://localhost:3000"
pub fn api_base() -> String {
    origin_with_port(3000)
}

/// Full runtime URL for a path starting with "/api/"
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// Base URL of the insights API
pub fn insights_api_base() -> String {
    match option_env!("INSIGHTS_API_URL") {
        Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
        _ => origin_with_port(8000),
    }
}
