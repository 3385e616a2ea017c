use once_cell::sync::Lazy;
use serde::Serialize;
use sqlx::{
    error::BoxDynError,
    postgres::{PgTypeInfo, PgValueRef},
    Decode, Postgres, Type,
};
use unicode_segmentation::UnicodeSegmentation;
use validator::ValidationError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UserName(String);

static FORBIDDEN_CHARS: [char; 10] = ['<', '>', '\'', '"', '\\', '(', ')', '{', '}', '/'];
static FORBIDDEN_CHARS_STRING: Lazy<String> = Lazy::new(|| String::from_iter(FORBIDDEN_CHARS));

impl UserName {
    pub fn parse(s: String) -> Result<UserName, String> {
        match s {
            _ if s.trim().is_empty() => Err(format!(
                "User name is empty or contains whitespace only: `{s}`"
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
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Type<Postgres> for UserName {
    fn type_info() -> PgTypeInfo {
        String::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for UserName {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let name = String::decode(value)?;
        Self::parse(name).map_err(|e| e.into())
    }
}

pub fn validate_user_name(value: &str) -> Result<(), ValidationError> {
    UserName::parse(value.to_string()).map(|_| ()).map_err(|e| {
        let mut error = ValidationError::new("user_name");
        error.message = Some(e.into());
        error
    })
}
