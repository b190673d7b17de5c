use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::checklist::gate::ChecklistGateError;
use crate::workflows::checklist::generator::AiTransportError;
use crate::workflows::checklist::store::StoreError;
use crate::workflows::checklist::{ContextError, FallbackDataError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Checklist(ChecklistGateError),
    FallbackData(FallbackDataError),
    Gateway(AiTransportError),
    Context(ContextError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {err}"),
            AppError::Telemetry(err) => write!(f, "telemetry error: {err}"),
            AppError::Io(err) => write!(f, "io error: {err}"),
            AppError::Server(err) => write!(f, "server error: {err}"),
            AppError::Checklist(err) => write!(f, "checklist error: {err}"),
            AppError::FallbackData(err) => write!(f, "fallback data error: {err}"),
            AppError::Gateway(err) => write!(f, "completion gateway error: {err}"),
            AppError::Context(err) => write!(f, "context backend error: {err}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Checklist(err) => Some(err),
            AppError::FallbackData(err) => Some(err),
            AppError::Gateway(err) => Some(err),
            AppError::Context(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Checklist(ChecklistGateError::Store(StoreError::Unavailable(_))) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ChecklistGateError> for AppError {
    fn from(value: ChecklistGateError) -> Self {
        Self::Checklist(value)
    }
}

impl From<FallbackDataError> for AppError {
    fn from(value: FallbackDataError) -> Self {
        Self::FallbackData(value)
    }
}

impl From<AiTransportError> for AppError {
    fn from(value: AiTransportError) -> Self {
        Self::Gateway(value)
    }
}

impl From<ContextError> for AppError {
    fn from(value: ContextError) -> Self {
        Self::Context(value)
    }
}
