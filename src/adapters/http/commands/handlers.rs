//! HTTP handler for command dispatch.
//!
//! The command name comes from the path and the JSON body is the payload.
//! Caller identity, correlation ID and the time budget come from headers.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::application::{DispatchGateway, DispatchRequest};
use crate::bus::{CallContext, CancellationError, DispatchError};
use crate::config::DispatchConfig;
use crate::domain::foundation::{DomainError, ErrorCode, Identity, UserId, ValidationError};
use crate::domain::user::UserCommand;

use super::dto::ErrorResponse;

/// Caller's user ID (UUID).
pub const USER_ID_HEADER: &str = "x-user-id";
/// Caller's email address.
pub const USER_EMAIL_HEADER: &str = "x-user-email";
/// Correlation ID, generated when absent and echoed on the response.
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";
/// Requested time budget in milliseconds, clamped to the configured maximum.
pub const TIMEOUT_HEADER: &str = "x-request-timeout-ms";

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct CommandAppState {
    gateway: DispatchGateway<UserCommand>,
    dispatch: DispatchConfig,
}

impl CommandAppState {
    pub fn new(gateway: DispatchGateway<UserCommand>, dispatch: DispatchConfig) -> Self {
        Self { gateway, dispatch }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /commands/:name
pub async fn dispatch_command(
    State(state): State<CommandAppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let ctx = match call_context(&headers, &state.dispatch) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    let payload = match parse_payload(&body) {
        Ok(payload) => payload,
        Err(response) => return response,
    };

    let result = state
        .gateway
        .dispatch(&ctx, DispatchRequest::new(name, payload))
        .await;

    let mut response = match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => handle_dispatch_error(err),
    };

    if let Ok(value) = HeaderValue::from_str(ctx.correlation_id()) {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }
    response
}

// ════════════════════════════════════════════════════════════════════════════
// Request decoding
// ════════════════════════════════════════════════════════════════════════════

fn call_context(headers: &HeaderMap, config: &DispatchConfig) -> Result<CallContext, Response> {
    let requested_ms = match header(headers, TIMEOUT_HEADER) {
        Some(raw) => Some(raw.parse::<u64>().map_err(|_| {
            bad_request(format!(
                "Header '{}' must be a number of milliseconds",
                TIMEOUT_HEADER
            ))
        })?),
        None => None,
    };

    let mut ctx = CallContext::background().with_timeout(config.effective_timeout(requested_ms));

    if let Some(id) = header(headers, CORRELATION_ID_HEADER).filter(|id| !id.is_empty()) {
        ctx = ctx.with_correlation_id(id);
    }

    if let Some(raw) = header(headers, USER_ID_HEADER) {
        let user_id: UserId = raw.parse().map_err(|e: ValidationError| bad_request(e.to_string()))?;
        let mut identity = Identity::new(user_id);
        if let Some(email) = header(headers, USER_EMAIL_HEADER) {
            identity = identity.with_email(email);
        }
        ctx = ctx.with_identity(identity);
    }

    Ok(ctx)
}

fn parse_payload(body: &[u8]) -> Result<serde_json::Value, Response> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::Value::Null);
    }
    serde_json::from_slice(body)
        .map_err(|e| bad_request(format!("Request body is not valid JSON: {}", e)))
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
}

fn bad_request(message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::validation(message)),
    )
        .into_response()
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

/// Maps a dispatch failure to its status and body.
///
/// Internal failures, including infrastructure codes carried by a domain
/// error, are logged here and answered with a generic body. `Cancelled`
/// maps to 408 for contexts cancelled in-process: `call_context` attaches
/// only a deadline, and a client that disconnects drops the request future
/// before any response is produced.
fn handle_dispatch_error(error: DispatchError) -> Response {
    match error {
        DispatchError::Validation(err) => bad_request(err.to_string()),
        DispatchError::Unhandled(kind) => (
            StatusCode::NOT_IMPLEMENTED,
            Json(ErrorResponse::new(
                "UNHANDLED_COMMAND",
                format!("No handler registered for command '{}'", kind),
            )),
        )
            .into_response(),
        DispatchError::Domain(err) => {
            let body = if err.code.is_infrastructure() {
                tracing::error!(error = %err, "Command failed internally");
                ErrorResponse::internal()
            } else {
                ErrorResponse::domain(&err)
            };
            (domain_status(&err), Json(body)).into_response()
        }
        DispatchError::Internal(detail) => {
            tracing::error!(error = %detail, "Command failed internally");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal()),
            )
                .into_response()
        }
        DispatchError::Cancelled(CancellationError::DeadlineExceeded) => (
            StatusCode::GATEWAY_TIMEOUT,
            Json(ErrorResponse::new(
                "DEADLINE_EXCEEDED",
                "The command did not complete in time",
            )),
        )
            .into_response(),
        DispatchError::Cancelled(CancellationError::Cancelled) => (
            StatusCode::REQUEST_TIMEOUT,
            Json(ErrorResponse::new("CANCELLED", "The command was cancelled")),
        )
            .into_response(),
    }
}

fn domain_status(error: &DomainError) -> StatusCode {
    match error.code {
        ErrorCode::UserNotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::InvalidStateTransition => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::StorageError | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::HeaderName;
    use std::time::Duration;

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(HeaderName::from_static(*name), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn context_takes_identity_and_correlation_from_headers() {
        let user_id = UserId::new();
        let ctx = call_context(
            &headers(&[
                (USER_ID_HEADER, user_id.to_string().as_str()),
                (USER_EMAIL_HEADER, "ada@example.com"),
                (CORRELATION_ID_HEADER, "req-7"),
            ]),
            &DispatchConfig::default(),
        )
        .unwrap();

        let identity = ctx.identity().unwrap();
        assert_eq!(identity.user_id, user_id);
        assert_eq!(identity.email.as_deref(), Some("ada@example.com"));
        assert_eq!(ctx.correlation_id(), "req-7");
    }

    #[test]
    fn requested_timeout_is_clamped_to_maximum() {
        let config = DispatchConfig {
            default_timeout_ms: 100,
            max_timeout_ms: 1_000,
        };

        let ctx = call_context(&headers(&[(TIMEOUT_HEADER, "600000")]), &config).unwrap();
        assert!(ctx.remaining().unwrap() <= Duration::from_millis(1_000));

        let ctx = call_context(&HeaderMap::new(), &config).unwrap();
        assert!(ctx.remaining().unwrap() <= Duration::from_millis(100));
    }

    #[test]
    fn malformed_headers_are_rejected() {
        let config = DispatchConfig::default();

        let response = call_context(&headers(&[(USER_ID_HEADER, "nope")]), &config).unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = call_context(&headers(&[(TIMEOUT_HEADER, "soon")]), &config).unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn empty_body_is_a_null_payload() {
        assert_eq!(parse_payload(b"").unwrap(), serde_json::Value::Null);
        assert_eq!(parse_payload(b"  \n").unwrap(), serde_json::Value::Null);
        assert!(parse_payload(b"{not json").is_err());
    }

    #[test]
    fn dispatch_errors_map_to_statuses() {
        let cases = [
            (
                DispatchError::Validation(ValidationError::empty_field("email")),
                StatusCode::BAD_REQUEST,
            ),
            (
                DispatchError::Unhandled("register-with-email".into()),
                StatusCode::NOT_IMPLEMENTED,
            ),
            (
                DispatchError::Domain(DomainError::new(ErrorCode::UserNotFound, "gone")),
                StatusCode::NOT_FOUND,
            ),
            (
                DispatchError::Domain(DomainError::new(ErrorCode::Conflict, "taken")),
                StatusCode::CONFLICT,
            ),
            (
                DispatchError::Domain(DomainError::new(ErrorCode::Unauthorized, "who")),
                StatusCode::UNAUTHORIZED,
            ),
            (
                DispatchError::Domain(DomainError::new(ErrorCode::Forbidden, "no")),
                StatusCode::FORBIDDEN,
            ),
            (
                DispatchError::Domain(DomainError::new(ErrorCode::InvalidStateTransition, "same")),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                DispatchError::Internal("secret detail".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                DispatchError::Cancelled(CancellationError::DeadlineExceeded),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                DispatchError::Cancelled(CancellationError::Cancelled),
                StatusCode::REQUEST_TIMEOUT,
            ),
        ];

        for (error, expected) in cases {
            let rendered = error.to_string();
            assert_eq!(handle_dispatch_error(error).status(), expected, "{}", rendered);
        }
    }

    #[tokio::test]
    async fn internal_failure_detail_never_reaches_the_body() {
        let failures = [
            DispatchError::Internal("connection string postgres://admin:hunter2".into()),
            DispatchError::Domain(DomainError::new(
                ErrorCode::StorageError,
                "connection string postgres://admin:hunter2",
            )),
        ];

        for error in failures {
            let response = handle_dispatch_error(error);
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

            let text = body_text(response).await;
            assert!(!text.contains("hunter2"), "leaked detail: {}", text);

            let body: serde_json::Value = serde_json::from_str(&text).unwrap();
            assert_eq!(body["code"], "INTERNAL_ERROR");
        }
    }

    #[tokio::test]
    async fn domain_errors_carry_their_code() {
        let cases = [
            (ErrorCode::UserNotFound, "USER_NOT_FOUND"),
            (ErrorCode::Conflict, "CONFLICT"),
            (ErrorCode::Unauthorized, "UNAUTHORIZED"),
            (ErrorCode::Forbidden, "FORBIDDEN"),
            (ErrorCode::InvalidStateTransition, "INVALID_STATE_TRANSITION"),
        ];

        for (code, expected) in cases {
            let response = handle_dispatch_error(DispatchError::Domain(DomainError::new(
                code,
                "rule violated",
            )));
            let body: serde_json::Value =
                serde_json::from_str(&body_text(response).await).unwrap();
            assert_eq!(body["code"], expected);
            assert_eq!(body["message"], "rule violated");
        }
    }
}
