//! Cross-origin policy for the API routes.

use std::sync::Arc;

use axum::http::{
    header::{
        ACCEPT, ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD, AUTHORIZATION,
        CONTENT_TYPE, ORIGIN,
    },
    request::Parts,
    HeaderName, HeaderValue, Method,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Config;

const X_REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");

/// Build the CORS layer from configuration.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let patterns: Arc<Vec<String>> = Arc::new(
        config
            .cors_allowed_origins
            .iter()
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect(),
    );

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin
                    .to_str()
                    .map(|origin| origin_allowed(&patterns, origin))
                    .unwrap_or(false)
            },
        ))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            X_REQUESTED_WITH,
            ACCEPT,
            ORIGIN,
            ACCESS_CONTROL_REQUEST_METHOD,
            ACCESS_CONTROL_REQUEST_HEADERS,
        ])
        .allow_credentials(true)
        .max_age(config.cors_max_age())
}

/// Whether any pattern admits `origin`.
pub fn origin_allowed(patterns: &[String], origin: &str) -> bool {
    patterns.iter().any(|p| origin_matches(p, origin))
}

/// Match an origin against a pattern.
///
/// Without a `*` the match is exact. A single `*` stands for one or more
/// host labels, e.g. `https://*.vercel.app` admits `https://app.vercel.app`
/// and `https://a.b.vercel.app` but not `https://vercel.app`.
pub fn origin_matches(pattern: &str, origin: &str) -> bool {
    let Some((prefix, suffix)) = pattern.split_once('*') else {
        return pattern == origin;
    };

    if origin.len() <= prefix.len() + suffix.len() {
        return false;
    }

    let Some(middle) = origin
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(suffix))
    else {
        return false;
    };

    !middle.starts_with('.')
        && !middle.ends_with('.')
        && middle
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
}
