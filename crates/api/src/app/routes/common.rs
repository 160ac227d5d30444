use axum::http::StatusCode;
use axum::response::Response;
use core::str::FromStr;

use crate::app::errors;

/// Parse a path id; a malformed value gets the same not-found response an
/// absent document would, so callers cannot probe id validity.
pub fn parse_id<T: FromStr>(raw: &str) -> Result<T, Response> {
    raw.parse()
        .map_err(|_| errors::json_error(StatusCode::NOT_FOUND, "not_found", "not found"))
}
