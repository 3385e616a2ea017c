use once_cell::sync::Lazy;
use serde::Serialize;
use sqlx::{
    error::BoxDynError,
    postgres::{PgTypeInfo, PgValueRef},
    Decode, Postgres, Type,
};
use unicode_segmentation::UnicodeSegmentation;
use validator::ValidationError;

/// Display name of a subscribed or catalog service, e.g. "Netflix".
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ServiceName(String);

static FORBIDDEN_CHARS: [char; 8] = ['<', '>', '\'', '"', '\\', '{', '}', '/'];
static FORBIDDEN_CHARS_STRING: Lazy<String> = Lazy::new(|| String::from_iter(FORBIDDEN_CHARS));

impl ServiceName {
    pub fn parse(s: String) -> Result<ServiceName, String> {
        match s {
            _ if s.trim().is_empty() => Err(format!(
                "Service name is empty or contains whitespace only: `{s}`"
            )),
            _ if s.graphemes(true).count() > 256 => {
                Err(format!("`{s}` is longer than 256 graphemes"))
            }
            _ if s.chars().any(|c| FORBIDDEN_CHARS.contains(&c)) => Err(format!(
                "`{s}` contains at least one of forbidden characters: {}",
                *FORBIDDEN_CHARS_STRING
            )),
            _ => Ok(Self(s)),
        }
    }

    pub fn to_lowercase(&self) -> String {
        self.0.to_lowercase()
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Type<Postgres> for ServiceName {
    fn type_info() -> PgTypeInfo {
        String::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for ServiceName {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let name = String::decode(value)?;
        Self::parse(name).map_err(|e| e.into())
    }
}

pub fn validate_service_name(value: &str) -> Result<(), ValidationError> {
    ServiceName::parse(value.to_string())
        .map(|_| ())
        .map_err(|e| {
            let mut error = ValidationError::new("service_name");
            error.message = Some(e.into());
            error
        })
}
