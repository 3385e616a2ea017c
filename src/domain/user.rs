use super::{UserEmail, UserName};
use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: UserEmail,
    pub name: UserName,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl User {
    pub fn new(email: UserEmail, name: UserName) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            name,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}
