//! JSON error responses.

use salvo::{
    FlowCtrl, Response, Scribe,
    catcher::Catcher,
    handler,
    http::{ResBody, StatusCode, StatusError},
    oapi::{self, Components, EndpointOutRegister, Operation, ToSchema},
    prelude::Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body of every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct ErrorResponse {
    /// Always `false`.
    pub success: bool,

    /// Human readable description of the failure.
    pub message: String,
}

/// An error rendered as `{"success": false, "message": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{status}: {message}")]
pub(crate) struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub(crate) fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub(crate) fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    #[cfg(test)]
    pub(crate) fn status(&self) -> StatusCode {
        self.status
    }

    #[cfg(test)]
    pub(crate) fn message(&self) -> &str {
        &self.message
    }
}

impl Scribe for ApiError {
    fn render(self, res: &mut Response) {
        res.status_code(self.status);
        res.render(Json(ErrorResponse {
            success: false,
            message: self.message,
        }));
    }
}

impl EndpointOutRegister for ApiError {
    fn register(components: &mut Components, operation: &mut Operation) {
        for (status, description) in [
            (StatusCode::BAD_REQUEST, "Bad Request"),
            (StatusCode::NOT_FOUND, "Not Found"),
            (StatusCode::CONFLICT, "Conflict"),
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
        ] {
            let schema = ErrorResponse::to_schema(components);

            operation.responses.insert(
                status.as_str(),
                oapi::Response::new(description)
                    .add_content("application/json", oapi::Content::new(schema)),
            );
        }
    }
}

/// Catcher that gives failures raised by salvo itself (unparseable bodies and path
/// parameters, unknown routes, caught panics) the same body as handler errors.
pub(crate) fn json_catcher() -> Catcher {
    Catcher::default().hoop(render_status_error)
}

#[handler]
async fn render_status_error(res: &mut Response, ctrl: &mut FlowCtrl) {
    let status = res.status_code.unwrap_or(StatusCode::NOT_FOUND);

    let message = match &res.body {
        ResBody::Error(error) => status_error_message(error),
        _ => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    };

    ApiError::new(status, message).render(res);
    ctrl.skip_rest();
}

fn status_error_message(error: &StatusError) -> String {
    match &error.cause {
        Some(cause) if error.code == StatusCode::BAD_REQUEST => format!("Invalid request: {cause}"),
        _ => error.detail.clone().unwrap_or_else(|| error.brief.clone()),
    }
}
