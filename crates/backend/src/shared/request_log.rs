//! Per-request console line: time | duration | size | status method path

use axum::body::{to_bytes, Body};
use axum::http::{header, Request};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Local;

/// Форматирует число с разделителями тысяч (точками)
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('.');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

fn is_event_stream(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("text/event-stream"))
        .unwrap_or(false)
}

fn print_line(status: u16, duration_ms: u128, size: &str, method: &str, path: &str) {
    // голубой для 200, коричневый для остальных
    let color_code = if status == 200 { "36" } else { "33" };
    println!(
        "\x1b[{}m{}\x1b[0m | {:>5}ms | {:>12} | {} {:>6} {}",
        color_code,
        Local::now().format("%H:%M:%S"),
        duration_ms,
        size,
        status,
        method,
        path
    );
}

/// Logs every request. Buffered bodies are measured; event streams are
/// passed through untouched since their size is only known at the end.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;

    if is_event_stream(&response) {
        print_line(
            response.status().as_u16(),
            start.elapsed().as_millis(),
            "stream",
            method.as_str(),
            uri.path(),
        );
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(_) => {
            print_line(
                parts.status.as_u16(),
                start.elapsed().as_millis(),
                "error",
                method.as_str(),
                uri.path(),
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    print_line(
        parts.status.as_u16(),
        start.elapsed().as_millis(),
        &format_number(bytes.len()),
        method.as_str(),
        uri.path(),
    );

    Response::from_parts(parts, Body::from(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1.000");
        assert_eq!(format_number(1234567), "1.234.567");
    }

    #[test]
    fn test_event_stream_detection() {
        let response = Response::builder()
            .header(header::CONTENT_TYPE, "text/event-stream")
            .body(Body::empty())
            .unwrap();
        assert!(is_event_stream(&response));

        let response = Response::builder()
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::empty())
            .unwrap();
        assert!(!is_event_stream(&response));
    }
}
