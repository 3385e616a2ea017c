use super::{date_format, BillingCycle, Cost, ServiceName, SubscriptionStatus, UserEmail};
use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: Uuid,
    pub owner_email: UserEmail,
    pub name: ServiceName,
    pub category: Option<String>,
    pub cost: Cost,
    pub billing_cycle: BillingCycle,
    #[serde(with = "date_format")]
    pub renewal_date: Date,
    #[serde(with = "date_format::option")]
    pub expiration_date: Option<Date>,
    pub status: SubscriptionStatus,
    pub logo_url: Option<String>,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_used: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Subscription {
    pub fn create(owner_email: UserEmail, new: NewSubscription) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_email,
            name: new.name,
            category: new.category,
            cost: new.cost,
            billing_cycle: new.billing_cycle,
            renewal_date: new.renewal_date,
            expiration_date: new.expiration_date,
            status: new.status,
            logo_url: new.logo_url,
            description: new.description,
            last_used: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    /// Applies a partial update. Fields the patch leaves unset keep their
    /// current value; optional fields cannot be cleared through a patch.
    pub fn apply(&mut self, patch: &SubscriptionPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(category) = &patch.category {
            self.category = Some(category.clone());
        }
        if let Some(cost) = &patch.cost {
            self.cost = cost.clone();
        }
        if let Some(billing_cycle) = patch.billing_cycle {
            self.billing_cycle = billing_cycle;
        }
        if let Some(renewal_date) = patch.renewal_date {
            self.renewal_date = renewal_date;
        }
        if let Some(expiration_date) = patch.expiration_date {
            self.expiration_date = Some(expiration_date);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(logo_url) = &patch.logo_url {
            self.logo_url = Some(logo_url.clone());
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
    }
}

/// Validated input for a manual subscription entry; the owner, id and
/// timestamps are filled in server-side.
pub struct NewSubscription {
    pub name: ServiceName,
    pub category: Option<String>,
    pub cost: Cost,
    pub billing_cycle: BillingCycle,
    pub renewal_date: Date,
    pub expiration_date: Option<Date>,
    pub status: SubscriptionStatus,
    pub logo_url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default)]
pub struct SubscriptionPatch {
    pub name: Option<ServiceName>,
    pub category: Option<String>,
    pub cost: Option<Cost>,
    pub billing_cycle: Option<BillingCycle>,
    pub renewal_date: Option<Date>,
    pub expiration_date: Option<Date>,
    pub status: Option<SubscriptionStatus>,
    pub logo_url: Option<String>,
    pub description: Option<String>,
}
