mod memory;
mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

use crate::domain::{
    AvailableService, LaunchStats, ServiceLaunch, Subscription, SubscriptionPatch, User,
    UserEmail, UserName,
};
use async_trait::async_trait;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct StoreError(#[from] anyhow::Error);

/// Persistence behind the API. Subscription and launch operations take the
/// owner's email and must never return another owner's rows.
#[async_trait]
pub trait Store: Send + Sync {
    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn user_by_email(&self, email: &UserEmail) -> Result<Option<User>, StoreError>;

    /// Creates a user unless one already exists for the email; returns the
    /// surviving row either way, so concurrent first logins are safe.
    async fn create_user(&self, email: &UserEmail, name: &UserName) -> Result<User, StoreError>;

    async fn available_services(&self) -> Result<Vec<AvailableService>, StoreError>;

    async fn available_service(&self, id: Uuid) -> Result<Option<AvailableService>, StoreError>;

    async fn subscriptions(&self, owner: &UserEmail) -> Result<Vec<Subscription>, StoreError>;

    async fn subscription(
        &self,
        owner: &UserEmail,
        id: Uuid,
    ) -> Result<Option<Subscription>, StoreError>;

    /// Subscriptions whose expiration date falls within `[from, until]`,
    /// both inclusive. Rows without an expiration date never appear.
    async fn expiring_subscriptions(
        &self,
        owner: &UserEmail,
        from: Date,
        until: Date,
    ) -> Result<Vec<Subscription>, StoreError>;

    async fn insert_subscription(&self, subscription: &Subscription) -> Result<(), StoreError>;

    async fn update_subscription(
        &self,
        owner: &UserEmail,
        id: Uuid,
        patch: &SubscriptionPatch,
    ) -> Result<Option<Subscription>, StoreError>;

    async fn delete_subscription(&self, owner: &UserEmail, id: Uuid) -> Result<bool, StoreError>;

    /// Appends a launch record and bumps the subscription's `last_used`.
    /// Returns `None` when the subscription is absent or owned by someone
    /// else.
    async fn record_launch(
        &self,
        owner: &UserEmail,
        subscription_id: Uuid,
        launched_at: OffsetDateTime,
    ) -> Result<Option<ServiceLaunch>, StoreError>;

    async fn launch_stats(&self, owner: &UserEmail) -> Result<Vec<LaunchStats>, StoreError>;
}

/// Owner-scoped view over a [`Store`]. Handlers go through this for every
/// subscription and launch operation, so the tenancy filter is applied in
/// exactly one place.
pub struct ScopedStore<'a> {
    store: &'a dyn Store,
    owner: &'a UserEmail,
}

impl<'a> ScopedStore<'a> {
    pub fn new(store: &'a dyn Store, owner: &'a UserEmail) -> Self {
        Self { store, owner }
    }

    pub fn owner(&self) -> &UserEmail {
        self.owner
    }

    pub async fn subscriptions(&self) -> Result<Vec<Subscription>, StoreError> {
        self.store.subscriptions(self.owner).await
    }

    pub async fn subscription(&self, id: Uuid) -> Result<Option<Subscription>, StoreError> {
        self.store.subscription(self.owner, id).await
    }

    pub async fn expiring_subscriptions(
        &self,
        from: Date,
        until: Date,
    ) -> Result<Vec<Subscription>, StoreError> {
        self.store.expiring_subscriptions(self.owner, from, until).await
    }

    pub async fn insert_subscription(
        &self,
        subscription: &Subscription,
    ) -> Result<(), StoreError> {
        self.store.insert_subscription(subscription).await
    }

    pub async fn update_subscription(
        &self,
        id: Uuid,
        patch: &SubscriptionPatch,
    ) -> Result<Option<Subscription>, StoreError> {
        self.store.update_subscription(self.owner, id, patch).await
    }

    pub async fn delete_subscription(&self, id: Uuid) -> Result<bool, StoreError> {
        self.store.delete_subscription(self.owner, id).await
    }

    pub async fn record_launch(
        &self,
        subscription_id: Uuid,
        launched_at: OffsetDateTime,
    ) -> Result<Option<ServiceLaunch>, StoreError> {
        self.store
            .record_launch(self.owner, subscription_id, launched_at)
            .await
    }

    pub async fn launch_stats(&self) -> Result<Vec<LaunchStats>, StoreError> {
        self.store.launch_stats(self.owner).await
    }
}
