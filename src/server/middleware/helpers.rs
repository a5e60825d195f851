//! Helper functions for middleware

use actix_web::http::header::HeaderMap;

/// Read the authenticated subject from `header`
///
/// Surrounding whitespace is ignored; an empty value counts as absent.
pub fn extract_subject(headers: &HeaderMap, header: &str) -> Option<String> {
    headers
        .get(header)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|subject| !subject.is_empty())
        .map(String::from)
}

/// Check if a route belongs to the back-office
pub fn is_admin_route(path: &str) -> bool {
    path == "/admin" || path.starts_with("/admin/")
}
