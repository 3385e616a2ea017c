use serde::{Deserialize, Serialize};
use sqlx::{
    error::BoxDynError,
    postgres::{PgTypeInfo, PgValueRef},
    Decode, Postgres, Type,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Monthly,
    Annual,
}

impl AsRef<str> for BillingCycle {
    fn as_ref(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "monthly",
            BillingCycle::Annual => "annual",
        }
    }
}

impl TryFrom<String> for BillingCycle {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_ref() {
            "monthly" => Ok(BillingCycle::Monthly),
            "annual" => Ok(BillingCycle::Annual),
            other => Err(format!(
                "`{other}` is not a valid billing cycle. Use either `monthly` or `annual`."
            )),
        }
    }
}

impl Type<Postgres> for BillingCycle {
    fn type_info() -> PgTypeInfo {
        String::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for BillingCycle {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let cycle = String::decode(value)?;
        Self::try_from(cycle).map_err(|e| e.into())
    }
}
