use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;
use validator::{ValidationErrors, ValidationErrorsKind};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request validation failed")]
    Validation(FieldErrors),
    #[error("Authentication required")]
    Auth,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Session operation failed")]
    Session(#[source] anyhow::Error),
    #[error("Something went wrong")]
    Unexpected(#[from] anyhow::Error),
}

impl ApiError {
    pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(FieldErrors::single(name, message))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Auth => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Session(_) | Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Validation(_) | Self::Auth | Self::NotFound(_) => {
                tracing::warn!("{:#?}", self);
            }
            Self::Session(_) | Self::Unexpected(_) => {
                tracing::error!("{:#?}", self);
            }
        }

        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
            fields: match self {
                Self::Validation(fields) => Some(fields),
                _ => None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<crate::storage::StoreError> for ApiError {
    fn from(e: crate::storage::StoreError) -> Self {
        Self::Unexpected(anyhow::Error::from(e))
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

/// Per-field validation messages, keyed by the payload field name.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn single(name: impl Into<String>, message: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(name.into(), vec![message.into()]);
        Self(fields)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let fields = errors
            .into_errors()
            .into_iter()
            .filter_map(|(name, kind)| match kind {
                ValidationErrorsKind::Field(errors) => {
                    let messages = errors
                        .into_iter()
                        .map(|e| match e.message {
                            Some(message) => message.into_owned(),
                            None => e.code.into_owned(),
                        })
                        .collect();
                    Some((name.to_string(), messages))
                }
                _ => None,
            })
            .collect();

        Self(fields)
    }
}
