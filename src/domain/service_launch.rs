use super::{ServiceName, UserEmail};
use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Append-only record of a user opening a subscribed service.
#[derive(Clone, Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLaunch {
    pub id: Uuid,
    pub subscription_id: Uuid,
    pub owner_email: UserEmail,
    pub service_name: ServiceName,
    #[serde(with = "time::serde::rfc3339")]
    pub launched_at: OffsetDateTime,
}

/// Per-service aggregate over a user's launch history.
#[derive(Clone, Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LaunchStats {
    pub service_name: String,
    pub launch_count: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub last_launched_at: OffsetDateTime,
}
