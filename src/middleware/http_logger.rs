use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use std::time::Instant;

const SENSITIVE_FIELDS: [&str; 8] = [
    "password",
    "token",
    "jwt",
    "accessToken",
    "authorization",
    "secret",
    "apiKey",
    "credentials",
];

const SENSITIVE_HEADERS: [&str; 5] = [
    "authorization",
    "cookie",
    "set-cookie",
    "x-api-key",
    "x-auth-token",
];

/// Deployment label attached to every request log line.
#[derive(Clone)]
pub struct LogContext {
    pub app_env: String,
}

impl LogContext {
    /// Production logs keep only the request envelope.
    pub fn logs_bodies(&self) -> bool {
        self.app_env != "production"
    }
}

fn empty_body() -> Value {
    Value::Object(serde_json::Map::new())
}

fn should_ignore_path(path: &str) -> bool {
    matches!(path, "/health" | "/health/")
}

pub fn filter_sensitive_data(mut value: Value) -> Value {
    if let Value::Object(ref mut map) = value {
        for field in SENSITIVE_FIELDS {
            if map.contains_key(field) {
                map.insert(field.to_string(), Value::String("[REDACTED]".to_string()));
            }
        }
    }
    value
}

pub fn filter_sensitive_headers(headers: &HeaderMap) -> HeaderMap {
    let mut filtered_headers = headers.clone();

    for header_name in SENSITIVE_HEADERS {
        if filtered_headers.contains_key(header_name) {
            filtered_headers.insert(header_name, HeaderValue::from_static("[REDACTED]"));
        }
    }

    filtered_headers
}

fn json_or_empty(bytes: &Bytes) -> Value {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(json) => filter_sensitive_data(json),
        Err(_) => empty_body(),
    }
}

pub async fn http_logger(
    State(ctx): State<LogContext>,
    req: Request,
    next: Next,
) -> std::result::Result<impl IntoResponse, (StatusCode, String)> {
    if should_ignore_path(req.uri().path()) || req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let start_time = Instant::now();

    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();
    let req_headers = req.headers().clone();
    let x_request_id = req_headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let log_bodies = ctx.logs_bodies();

    let (req, req_body) = if log_bodies {
        let (parts, body) = req.into_parts();
        let bytes = buffer_body("request", body).await?;
        let json_body = json_or_empty(&bytes);
        (Request::from_parts(parts, Body::from(bytes)), json_body)
    } else {
        (req, empty_body())
    };

    let mut response = next.run(req).await;

    let latency = start_time.elapsed();
    let status = response.status();
    let res_headers = response.headers().clone();

    let should_log_body =
        log_bodies && matches!(method, Method::POST | Method::PUT | Method::PATCH);
    let res_body = if should_log_body {
        let (parts, body) = response.into_parts();
        let bytes = buffer_body("response", body).await?;
        let json_body = json_or_empty(&bytes);
        response = Response::from_parts(parts, Body::from(bytes));
        json_body
    } else {
        empty_body()
    };

    tracing::info!(
        method = ?method,
        uri = ?uri,
        path = %uri.path(),
        x_request_id = %x_request_id,
        version = ?version,
        req_headers = ?filter_sensitive_headers(&req_headers),
        req_body = %req_body,
        status = ?status,
        latency_ms = latency.as_millis(),
        res_headers = ?filter_sensitive_headers(&res_headers),
        res_body = %res_body,
        app_env = %ctx.app_env,
        "HTTP request completed"
    );

    Ok(response)
}

pub async fn buffer_body<B>(
    direction: &str,
    body: B,
) -> std::result::Result<Bytes, (StatusCode, String)>
where
    B: BodyExt,
    B::Error: std::fmt::Display,
{
    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("failed to read {direction} body: {err}"),
            ));
        }
    };

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redacts_credentials_in_bodies() {
        let filtered = filter_sensitive_data(json!({
            "email": "admin@example.com",
            "password": "hunter2",
            "token": "abc",
        }));

        assert_eq!(filtered["email"], "admin@example.com");
        assert_eq!(filtered["password"], "[REDACTED]");
        assert_eq!(filtered["token"], "[REDACTED]");
    }

    #[test]
    fn redacts_cookie_and_authorization_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("cookie", HeaderValue::from_static("token=abc"));
        headers.insert("authorization", HeaderValue::from_static("Bearer abc"));
        headers.insert("accept", HeaderValue::from_static("application/json"));

        let filtered = filter_sensitive_headers(&headers);
        assert_eq!(filtered["cookie"], "[REDACTED]");
        assert_eq!(filtered["authorization"], "[REDACTED]");
        assert_eq!(filtered["accept"], "application/json");
    }

    #[test]
    fn bodies_are_left_out_in_production() {
        let production = LogContext {
            app_env: "production".to_string(),
        };
        let local = LogContext {
            app_env: "local".to_string(),
        };

        assert!(!production.logs_bodies());
        assert!(local.logs_bodies());
    }

    #[test]
    fn health_checks_are_not_logged() {
        assert!(should_ignore_path("/health"));
        assert!(!should_ignore_path("/grades"));
    }
}
