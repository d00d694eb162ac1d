use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{
        FromRequest, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header::CONTENT_LENGTH},
    response::{IntoResponse, Response},
};
use peerstake_shared::Error;
use serde::Serialize;
use serde_json::{Value, json};

use crate::AppState;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] Error),

    #[error("{0}")]
    BadRequest(String),

    #[error("{message}: {cause}")]
    Internal { message: String, cause: String },
}

impl AppError {
    pub fn internal(message: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Self::Internal {
            message: message.into(),
            cause: cause.to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("Server error", err)
    }
}

/// Cause of a 500 response, attached as a response extension so
/// [`expose_error_detail`] can surface it outside production.
#[derive(Clone, Debug)]
pub struct ErrorDetail(pub String);

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<BTreeMap<String, Vec<String>>>,
}

fn body(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            message: message.into(),
            details: None,
        }),
    )
        .into_response()
}

fn server_error(message: String, cause: String) -> Response {
    tracing::error!(cause = %cause, "{message}");

    let mut response = body(StatusCode::INTERNAL_SERVER_ERROR, message);
    response.extensions_mut().insert(ErrorDetail(cause));
    response
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Domain(Error::Validate(errors)) => {
                let details = errors
                    .field_errors()
                    .into_iter()
                    .map(|(field, errors)| {
                        let messages = errors
                            .iter()
                            .map(|e| {
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            })
                            .collect();

                        (field.to_string(), messages)
                    })
                    .collect::<BTreeMap<String, Vec<String>>>();

                let message = details
                    .values()
                    .flatten()
                    .next()
                    .cloned()
                    .unwrap_or_else(|| "Validation failed".to_owned());

                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorBody {
                        message,
                        details: Some(details),
                    }),
                )
                    .into_response()
            }
            AppError::Domain(Error::User(msg)) | AppError::BadRequest(msg) => {
                body(StatusCode::BAD_REQUEST, msg)
            }
            AppError::Domain(Error::Unauthorized(msg)) => body(StatusCode::UNAUTHORIZED, msg),
            AppError::Domain(Error::Forbidden(msg)) => body(StatusCode::FORBIDDEN, msg),
            AppError::Domain(Error::NotFound(msg)) => body(StatusCode::NOT_FOUND, msg),
            AppError::Domain(Error::Server(cause)) => server_error("Server error".to_owned(), cause),
            AppError::Domain(Error::Unknown(err)) => {
                server_error("Server error".to_owned(), format!("{err:#}"))
            }
            AppError::Internal { message, cause } => server_error(message, cause),
        }
    }
}

/// JSON extractor whose rejections render as `{message}` with status 400.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Add the cause of 500 responses as an `error` field outside production.
pub async fn expose_error_detail(State(state): State<AppState>, response: Response) -> Response {
    if state.config.server.is_production() {
        return response;
    }

    let Some(ErrorDetail(cause)) = response.extensions().get::<ErrorDetail>().cloned() else {
        return response;
    };

    let (mut parts, body) = response.into_parts();
    let mut value = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => serde_json::from_slice::<Value>(&bytes).unwrap_or_else(|_| json!({})),
        Err(_) => json!({}),
    };

    if let Some(object) = value.as_object_mut() {
        object.insert("error".to_owned(), Value::String(cause));
    }

    parts.headers.remove(CONTENT_LENGTH);

    (parts, Json(value)).into_response()
}
