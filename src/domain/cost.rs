use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use sqlx::{
    error::BoxDynError,
    postgres::{PgTypeInfo, PgValueRef},
    Decode, Postgres, Type,
};

const COST_CHARS: &str = r"[0-9]{1,10}(\.[0-9]{1,2})?";

pub static COST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^{COST_CHARS}$")).unwrap());

pub fn cost_regex() -> String {
    COST_CHARS.to_string()
}

/// Monetary amount kept as the decimal string it arrived with, e.g. "15.99".
/// Stored verbatim so no float rounding ever leaks into persisted data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cost(String);

impl Cost {
    pub fn parse(s: String) -> Result<Cost, String> {
        if COST_RE.is_match(&s) {
            Ok(Self(s))
        } else {
            Err(format!(
                "`{s}` is not a valid amount; expected a decimal like `9.99`"
            ))
        }
    }

    pub fn amount(&self) -> f64 {
        self.0.parse().unwrap_or(0.0)
    }
}

impl AsRef<str> for Cost {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Type<Postgres> for Cost {
    fn type_info() -> PgTypeInfo {
        String::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for Cost {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let cost = String::decode(value)?;
        Self::parse(cost).map_err(|e| e.into())
    }
}
