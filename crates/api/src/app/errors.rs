use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stoa_core::DomainError;

/// Map a domain error to its HTTP shape.
///
/// Internal faults are the one kind whose detail never reaches the caller;
/// it is logged here and replaced with a generic message.
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        DomainError::Unauthenticated => json_error(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            "authentication required",
        ),
        DomainError::Unauthorized(reason) => {
            json_error(StatusCode::FORBIDDEN, "unauthorized", reason)
        }
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::Internal(detail) => {
            tracing::error!(detail = %detail, "request failed on an internal fault");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal server error",
            )
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_detail_is_not_echoed() {
        let response =
            domain_error_to_response(DomainError::internal("connection refused to 10.0.0.7"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn each_kind_has_a_distinct_status() {
        let cases = [
            (DomainError::validation("x"), StatusCode::BAD_REQUEST),
            (DomainError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (DomainError::unauthorized("x"), StatusCode::FORBIDDEN),
            (DomainError::NotFound, StatusCode::NOT_FOUND),
            (DomainError::conflict("x"), StatusCode::CONFLICT),
        ];
        for (err, status) in cases {
            assert_eq!(domain_error_to_response(err).status(), status);
        }
    }
}
