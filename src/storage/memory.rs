use super::{Store, StoreError};
use crate::catalog;
use crate::domain::{
    AvailableService, LaunchStats, ServiceLaunch, Subscription, SubscriptionPatch, User,
    UserEmail, UserName,
};
use async_trait::async_trait;
use std::collections::HashMap;
use time::{Date, OffsetDateTime};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Single-process storage backend holding everything behind one lock.
///
/// Used for local development and by the API test suite; it mirrors the
/// Postgres backend's semantics, including row ordering and the cascade
/// from users to their subscriptions.
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    catalog: Vec<AvailableService>,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    subscriptions: Vec<Subscription>,
    launches: Vec<ServiceLaunch>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_catalog(catalog::builtin_services())
    }

    pub fn with_catalog(mut catalog: Vec<AvailableService>) -> Self {
        catalog.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        Self {
            tables: RwLock::new(Tables::default()),
            catalog,
        }
    }

    /// Removes a user and their subscriptions. Launch records survive.
    pub async fn remove_user(&self, email: &UserEmail) -> bool {
        let mut tables = self.tables.write().await;
        let before = tables.users.len();
        tables.users.retain(|u| &u.email != email);
        tables.subscriptions.retain(|s| &s.owner_email != email);
        tables.users.len() < before
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn user_by_email(&self, email: &UserEmail) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| &u.email == email).cloned())
    }

    async fn create_user(&self, email: &UserEmail, name: &UserName) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables.users.iter().find(|u| &u.email == email) {
            return Ok(existing.clone());
        }
        let user = User::new(email.clone(), name.clone());
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn available_services(&self) -> Result<Vec<AvailableService>, StoreError> {
        Ok(self.catalog.clone())
    }

    async fn available_service(&self, id: Uuid) -> Result<Option<AvailableService>, StoreError> {
        Ok(self.catalog.iter().find(|s| s.id == id).cloned())
    }

    async fn subscriptions(&self, owner: &UserEmail) -> Result<Vec<Subscription>, StoreError> {
        let tables = self.tables.read().await;
        let mut subscriptions: Vec<_> = tables
            .subscriptions
            .iter()
            .filter(|s| &s.owner_email == owner)
            .cloned()
            .collect();
        subscriptions.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(subscriptions)
    }

    async fn subscription(
        &self,
        owner: &UserEmail,
        id: Uuid,
    ) -> Result<Option<Subscription>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .subscriptions
            .iter()
            .find(|s| &s.owner_email == owner && s.id == id)
            .cloned())
    }

    async fn expiring_subscriptions(
        &self,
        owner: &UserEmail,
        from: Date,
        until: Date,
    ) -> Result<Vec<Subscription>, StoreError> {
        let tables = self.tables.read().await;
        let mut subscriptions: Vec<_> = tables
            .subscriptions
            .iter()
            .filter(|s| &s.owner_email == owner)
            .filter(|s| {
                s.expiration_date
                    .map(|date| date >= from && date <= until)
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        subscriptions.sort_by(|a, b| {
            a.expiration_date
                .cmp(&b.expiration_date)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        Ok(subscriptions)
    }

    async fn insert_subscription(&self, subscription: &Subscription) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables.subscriptions.push(subscription.clone());
        Ok(())
    }

    async fn update_subscription(
        &self,
        owner: &UserEmail,
        id: Uuid,
        patch: &SubscriptionPatch,
    ) -> Result<Option<Subscription>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(subscription) = tables
            .subscriptions
            .iter_mut()
            .find(|s| &s.owner_email == owner && s.id == id)
        else {
            return Ok(None);
        };
        subscription.apply(patch);
        Ok(Some(subscription.clone()))
    }

    async fn delete_subscription(&self, owner: &UserEmail, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.subscriptions.len();
        tables
            .subscriptions
            .retain(|s| !(&s.owner_email == owner && s.id == id));
        Ok(tables.subscriptions.len() < before)
    }

    async fn record_launch(
        &self,
        owner: &UserEmail,
        subscription_id: Uuid,
        launched_at: OffsetDateTime,
    ) -> Result<Option<ServiceLaunch>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(subscription) = tables
            .subscriptions
            .iter_mut()
            .find(|s| &s.owner_email == owner && s.id == subscription_id)
        else {
            return Ok(None);
        };
        subscription.last_used = Some(launched_at);
        let launch = ServiceLaunch {
            id: Uuid::new_v4(),
            subscription_id,
            owner_email: owner.clone(),
            service_name: subscription.name.clone(),
            launched_at,
        };
        tables.launches.push(launch.clone());
        Ok(Some(launch))
    }

    async fn launch_stats(&self, owner: &UserEmail) -> Result<Vec<LaunchStats>, StoreError> {
        let tables = self.tables.read().await;
        let mut grouped: HashMap<String, (i64, OffsetDateTime)> = HashMap::new();
        for launch in tables.launches.iter().filter(|l| &l.owner_email == owner) {
            let entry = grouped
                .entry(launch.service_name.as_ref().to_string())
                .or_insert((0, launch.launched_at));
            entry.0 += 1;
            if launch.launched_at > entry.1 {
                entry.1 = launch.launched_at;
            }
        }
        let mut stats: Vec<_> = grouped
            .into_iter()
            .map(|(service_name, (launch_count, last_launched_at))| LaunchStats {
                service_name,
                launch_count,
                last_launched_at,
            })
            .collect();
        stats.sort_by(|a, b| {
            b.last_launched_at
                .cmp(&a.last_launched_at)
                .then_with(|| a.service_name.cmp(&b.service_name))
        });
        Ok(stats)
    }
}
