use super::{Store, StoreError};
use crate::domain::{
    AvailableService, BillingCycle, Cost, LaunchStats, ServiceLaunch, ServiceName, Subscription,
    SubscriptionPatch, User, UserEmail, UserName,
};
use anyhow::Context;
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

const SUBSCRIPTION_COLUMNS: &str = "id, owner_email, name, category, cost, billing_cycle, \
    renewal_date, expiration_date, status, logo_url, description, last_used, created_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn plans_for(&self, service_id: Uuid) -> Result<Vec<PlanRow>, StoreError> {
        let plans = sqlx::query_as::<_, PlanRow>(
            "SELECT id, name, price, billing_cycle, features \
             FROM service_plans WHERE service_id = $1 ORDER BY price::numeric",
        )
        .bind(service_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch service plans")?;

        Ok(plans)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user by id")?;

        Ok(user)
    }

    async fn user_by_email(&self, email: &UserEmail) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, created_at FROM users WHERE email = $1",
        )
        .bind(email.as_ref())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user by email")?;

        Ok(user)
    }

    async fn create_user(&self, email: &UserEmail, name: &UserName) -> Result<User, StoreError> {
        sqlx::query(
            "INSERT INTO users (id, email, name, created_at) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (email) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(email.as_ref())
        .bind(name.as_ref())
        .bind(OffsetDateTime::now_utc())
        .execute(&self.pool)
        .await
        .context("Failed to insert user")?;

        // The insert is a no-op when a concurrent login won the race, so
        // re-read to return the surviving row.
        let user = self
            .user_by_email(email)
            .await?
            .context("User vanished right after creation")?;

        Ok(user)
    }

    async fn available_services(&self) -> Result<Vec<AvailableService>, StoreError> {
        let services = sqlx::query_as::<_, ServiceRow>(
            "SELECT id, name, category, logo_url, description, base_price, is_popular, \
             features, launch_url \
             FROM available_services ORDER BY LOWER(name), id",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch available services")?;

        let mut assembled = Vec::with_capacity(services.len());
        for service in services {
            let plans = self.plans_for(service.id).await?;
            assembled.push(service.into_service(plans));
        }

        Ok(assembled)
    }

    async fn available_service(&self, id: Uuid) -> Result<Option<AvailableService>, StoreError> {
        let service = sqlx::query_as::<_, ServiceRow>(
            "SELECT id, name, category, logo_url, description, base_price, is_popular, \
             features, launch_url \
             FROM available_services WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch available service")?;

        match service {
            Some(service) => {
                let plans = self.plans_for(service.id).await?;
                Ok(Some(service.into_service(plans)))
            }
            None => Ok(None),
        }
    }

    async fn subscriptions(&self, owner: &UserEmail) -> Result<Vec<Subscription>, StoreError> {
        let subscriptions = sqlx::query_as::<_, Subscription>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions \
             WHERE owner_email = $1 ORDER BY LOWER(name), id",
        ))
        .bind(owner.as_ref())
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch subscriptions")?;

        Ok(subscriptions)
    }

    async fn subscription(
        &self,
        owner: &UserEmail,
        id: Uuid,
    ) -> Result<Option<Subscription>, StoreError> {
        let subscription = sqlx::query_as::<_, Subscription>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions \
             WHERE owner_email = $1 AND id = $2",
        ))
        .bind(owner.as_ref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch subscription")?;

        Ok(subscription)
    }

    async fn expiring_subscriptions(
        &self,
        owner: &UserEmail,
        from: Date,
        until: Date,
    ) -> Result<Vec<Subscription>, StoreError> {
        let subscriptions = sqlx::query_as::<_, Subscription>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions \
             WHERE owner_email = $1 \
             AND expiration_date IS NOT NULL \
             AND expiration_date BETWEEN $2 AND $3 \
             ORDER BY expiration_date, LOWER(name)",
        ))
        .bind(owner.as_ref())
        .bind(from)
        .bind(until)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch expiring subscriptions")?;

        Ok(subscriptions)
    }

    async fn insert_subscription(&self, subscription: &Subscription) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO subscriptions (id, owner_email, name, category, cost, billing_cycle, \
             renewal_date, expiration_date, status, logo_url, description, last_used, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(subscription.id)
        .bind(subscription.owner_email.as_ref())
        .bind(subscription.name.as_ref())
        .bind(&subscription.category)
        .bind(subscription.cost.as_ref())
        .bind(subscription.billing_cycle.as_ref())
        .bind(subscription.renewal_date)
        .bind(subscription.expiration_date)
        .bind(subscription.status.as_ref())
        .bind(&subscription.logo_url)
        .bind(&subscription.description)
        .bind(subscription.last_used)
        .bind(subscription.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to insert subscription")?;

        Ok(())
    }

    async fn update_subscription(
        &self,
        owner: &UserEmail,
        id: Uuid,
        patch: &SubscriptionPatch,
    ) -> Result<Option<Subscription>, StoreError> {
        // Read-modify-write without a version check; concurrent edits are
        // last-write-wins.
        let Some(mut subscription) = self.subscription(owner, id).await? else {
            return Ok(None);
        };

        subscription.apply(patch);

        sqlx::query(
            "UPDATE subscriptions SET name = $3, category = $4, cost = $5, billing_cycle = $6, \
             renewal_date = $7, expiration_date = $8, status = $9, logo_url = $10, \
             description = $11 \
             WHERE owner_email = $1 AND id = $2",
        )
        .bind(owner.as_ref())
        .bind(id)
        .bind(subscription.name.as_ref())
        .bind(&subscription.category)
        .bind(subscription.cost.as_ref())
        .bind(subscription.billing_cycle.as_ref())
        .bind(subscription.renewal_date)
        .bind(subscription.expiration_date)
        .bind(subscription.status.as_ref())
        .bind(&subscription.logo_url)
        .bind(&subscription.description)
        .execute(&self.pool)
        .await
        .context("Failed to update subscription")?;

        Ok(Some(subscription))
    }

    async fn delete_subscription(&self, owner: &UserEmail, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE owner_email = $1 AND id = $2")
            .bind(owner.as_ref())
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete subscription")?;

        Ok(result.rows_affected() > 0)
    }

    async fn record_launch(
        &self,
        owner: &UserEmail,
        subscription_id: Uuid,
        launched_at: OffsetDateTime,
    ) -> Result<Option<ServiceLaunch>, StoreError> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let subscription = sqlx::query_as::<_, Subscription>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions \
             WHERE owner_email = $1 AND id = $2",
        ))
        .bind(owner.as_ref())
        .bind(subscription_id)
        .fetch_optional(&mut *transaction)
        .await
        .context("Failed to fetch subscription for launch")?;

        let Some(subscription) = subscription else {
            return Ok(None);
        };

        let launch = ServiceLaunch {
            id: Uuid::new_v4(),
            subscription_id,
            owner_email: owner.clone(),
            service_name: subscription.name.clone(),
            launched_at,
        };

        sqlx::query(
            "INSERT INTO service_launches (id, subscription_id, owner_email, service_name, \
             launched_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(launch.id)
        .bind(launch.subscription_id)
        .bind(launch.owner_email.as_ref())
        .bind(launch.service_name.as_ref())
        .bind(launch.launched_at)
        .execute(&mut *transaction)
        .await
        .context("Failed to insert service launch")?;

        sqlx::query(
            "UPDATE subscriptions SET last_used = $3 WHERE owner_email = $1 AND id = $2",
        )
        .bind(owner.as_ref())
        .bind(subscription_id)
        .bind(launched_at)
        .execute(&mut *transaction)
        .await
        .context("Failed to update last used timestamp")?;

        transaction
            .commit()
            .await
            .context("Failed to commit transaction")?;

        Ok(Some(launch))
    }

    async fn launch_stats(&self, owner: &UserEmail) -> Result<Vec<LaunchStats>, StoreError> {
        let stats = sqlx::query_as::<_, LaunchStats>(
            "SELECT service_name, COUNT(*) AS launch_count, MAX(launched_at) AS last_launched_at \
             FROM service_launches WHERE owner_email = $1 \
             GROUP BY service_name \
             ORDER BY last_launched_at DESC, service_name",
        )
        .bind(owner.as_ref())
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch launch stats")?;

        Ok(stats)
    }
}

#[derive(FromRow)]
struct ServiceRow {
    id: Uuid,
    name: ServiceName,
    category: String,
    logo_url: String,
    description: String,
    base_price: Cost,
    is_popular: bool,
    features: Vec<String>,
    launch_url: Option<String>,
}

impl ServiceRow {
    fn into_service(self, plans: Vec<PlanRow>) -> AvailableService {
        AvailableService {
            id: self.id,
            name: self.name,
            category: self.category,
            logo_url: self.logo_url,
            description: self.description,
            base_price: self.base_price,
            plans: plans.into_iter().map(PlanRow::into_plan).collect(),
            is_popular: self.is_popular,
            features: self.features,
            launch_url: self.launch_url,
        }
    }
}

#[derive(FromRow)]
struct PlanRow {
    id: Uuid,
    name: String,
    price: Cost,
    billing_cycle: BillingCycle,
    features: Vec<String>,
}

impl PlanRow {
    fn into_plan(self) -> crate::domain::ServicePlan {
        crate::domain::ServicePlan {
            id: self.id,
            name: self.name,
            price: self.price,
            billing_cycle: self.billing_cycle,
            features: self.features,
        }
    }
}
