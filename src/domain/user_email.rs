use serde::Serialize;
use sqlx::{
    error::BoxDynError,
    postgres::{PgTypeInfo, PgValueRef},
    Decode, Postgres, Type,
};
use validator::validate_email;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserEmail(String);

impl UserEmail {
    pub fn parse(s: String) -> Result<UserEmail, String> {
        if validate_email(&s) {
            Ok(Self(s))
        } else {
            Err(format!("`{s}` email has invalid format"))
        }
    }
}

impl AsRef<str> for UserEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Type<Postgres> for UserEmail {
    fn type_info() -> PgTypeInfo {
        String::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for UserEmail {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let email = String::decode(value)?;
        Self::parse(email).map_err(|e| e.into())
    }
}
