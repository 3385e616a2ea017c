use serde::{Deserialize, Serialize};
use sqlx::{
    error::BoxDynError,
    postgres::{PgTypeInfo, PgValueRef},
    Decode, Postgres, Type,
};

/// Lifecycle label of a subscription. Any status may be set via update;
/// there is no server-side transition table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Inactive,
    Expiring,
}

impl AsRef<str> for SubscriptionStatus {
    fn as_ref(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Inactive => "inactive",
            SubscriptionStatus::Expiring => "expiring",
        }
    }
}

impl TryFrom<String> for SubscriptionStatus {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_ref() {
            "active" => Ok(SubscriptionStatus::Active),
            "inactive" => Ok(SubscriptionStatus::Inactive),
            "expiring" => Ok(SubscriptionStatus::Expiring),
            other => Err(format!(
                "`{other}` is not a valid variant of SubscriptionStatus",
            )),
        }
    }
}

impl Type<Postgres> for SubscriptionStatus {
    fn type_info() -> PgTypeInfo {
        String::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for SubscriptionStatus {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let status = String::decode(value)?;
        Self::try_from(status).map_err(|e| e.into())
    }
}
