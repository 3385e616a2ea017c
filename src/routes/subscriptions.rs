use crate::{
    app_state::AppState,
    authentication::CurrentUser,
    domain::{
        next_renewal_date, BillingCycle, Cost, NewSubscription, ServiceLaunch, ServiceName,
        Subscription, SubscriptionPatch, SubscriptionStatus,
    },
    errors::ApiError,
    extract::{PathId, ValidatedJson},
    insights::{self, CostBucket, RenewalWindow, SortKey, SubscriptionFilter},
};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use time::{Date, Duration, OffsetDateTime};
use uuid::Uuid;
use validator::Validate;

// The expiring window is capped at a century; anything wider would push
// the end date past the supported calendar range.
const MAX_EXPIRING_WINDOW_DAYS: i64 = 36_500;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/subscriptions", get(list).post(create))
        .route("/api/subscriptions/expiring", get(expiring))
        .route("/api/subscriptions/subscribe", post(subscribe))
        .route("/api/subscriptions/:id", get(get_by_id).patch(update).delete(remove))
        .route("/api/subscriptions/:id/launch", post(launch))
}

#[tracing::instrument(
    name = "List subscriptions",
    skip(app_state, user, query),
    fields(user_id = %user.id)
)]
async fn list(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Subscription>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::field("query", e.body_text()))?;
    let (filter, sort) = query.into_filter()?;
    let subscriptions = app_state.scoped_store(&user.email).subscriptions().await?;
    let today = OffsetDateTime::now_utc().date();

    Ok(Json(insights::filter_and_sort(
        subscriptions,
        &filter,
        sort,
        today,
    )))
}

#[tracing::instrument(
    name = "List expiring subscriptions",
    skip(app_state, user, query),
    fields(user_id = %user.id)
)]
async fn expiring(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    query: Result<Query<ExpiringQuery>, QueryRejection>,
) -> Result<Json<Vec<Subscription>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::field("days", e.body_text()))?;
    let days = query.days.unwrap_or(insights::EXPIRING_SOON_DAYS);
    if !(0..=MAX_EXPIRING_WINDOW_DAYS).contains(&days) {
        return Err(ApiError::field(
            "days",
            format!("must be between 0 and {MAX_EXPIRING_WINDOW_DAYS}"),
        ));
    }

    let today = OffsetDateTime::now_utc().date();
    let until = today + Duration::days(days);
    let subscriptions = app_state
        .scoped_store(&user.email)
        .expiring_subscriptions(today, until)
        .await?;

    Ok(Json(subscriptions))
}

#[tracing::instrument(
    name = "Get a subscription",
    skip(app_state, user),
    fields(user_id = %user.id, subscription_id = %id)
)]
async fn get_by_id(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    PathId(id): PathId,
) -> Result<Json<Subscription>, ApiError> {
    app_state
        .scoped_store(&user.email)
        .subscription(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Subscription"))
}

#[tracing::instrument(
    name = "Create a subscription",
    skip(app_state, user, payload),
    fields(user_id = %user.id)
)]
async fn create(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(payload): ValidatedJson<CreateSubscriptionPayload>,
) -> Result<(StatusCode, Json<Subscription>), ApiError> {
    let subscription = Subscription::create(user.email.clone(), payload.try_into()?);
    app_state
        .scoped_store(&user.email)
        .insert_subscription(&subscription)
        .await?;

    Ok((StatusCode::CREATED, Json(subscription)))
}

#[tracing::instrument(
    name = "Update a subscription",
    skip(app_state, user, payload),
    fields(user_id = %user.id, subscription_id = %id)
)]
async fn update(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    PathId(id): PathId,
    ValidatedJson(payload): ValidatedJson<UpdateSubscriptionPayload>,
) -> Result<Json<Subscription>, ApiError> {
    let patch = payload.try_into()?;
    app_state
        .scoped_store(&user.email)
        .update_subscription(id, &patch)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Subscription"))
}

#[tracing::instrument(
    name = "Delete a subscription",
    skip(app_state, user),
    fields(user_id = %user.id, subscription_id = %id)
)]
async fn remove(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    PathId(id): PathId,
) -> Result<StatusCode, ApiError> {
    if app_state
        .scoped_store(&user.email)
        .delete_subscription(id)
        .await?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Subscription"))
    }
}

/// One-click subscribe from the marketplace: the subscription is synthesized
/// from the chosen service and plan, renewing (and expiring) one billing
/// cycle from today.
#[tracing::instrument(
    name = "Subscribe to a catalog service",
    skip(app_state, user, payload),
    fields(user_id = %user.id, service_id = %payload.service_id, plan_id = %payload.plan_id)
)]
async fn subscribe(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(payload): ValidatedJson<SubscribePayload>,
) -> Result<(StatusCode, Json<Subscription>), ApiError> {
    let service = app_state
        .store
        .available_service(payload.service_id)
        .await?
        .ok_or(ApiError::NotFound("Service"))?;
    let plan = service
        .plan(payload.plan_id)
        .ok_or(ApiError::NotFound("Plan"))?;

    let today = OffsetDateTime::now_utc().date();
    let renewal_date = next_renewal_date(today, plan.billing_cycle);

    let subscription = Subscription::create(
        user.email.clone(),
        NewSubscription {
            name: service.name.clone(),
            category: Some(service.category.clone()),
            cost: plan.price.clone(),
            billing_cycle: plan.billing_cycle,
            renewal_date,
            expiration_date: Some(renewal_date),
            status: SubscriptionStatus::Active,
            logo_url: Some(service.logo_url.clone()),
            description: Some(service.description.clone()),
        },
    );
    app_state
        .scoped_store(&user.email)
        .insert_subscription(&subscription)
        .await?;

    Ok((StatusCode::CREATED, Json(subscription)))
}

#[tracing::instrument(
    name = "Record a service launch",
    skip(app_state, user),
    fields(user_id = %user.id, subscription_id = %id)
)]
async fn launch(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    PathId(id): PathId,
) -> Result<(StatusCode, Json<ServiceLaunch>), ApiError> {
    let launched_at = OffsetDateTime::now_utc();
    app_state
        .scoped_store(&user.email)
        .record_launch(id, launched_at)
        .await?
        .map(|launch| (StatusCode::CREATED, Json(launch)))
        .ok_or(ApiError::NotFound("Subscription"))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    search: Option<String>,
    category: Option<String>,
    cost_range: Option<String>,
    status: Option<String>,
    renewal: Option<String>,
    sort: Option<String>,
}

impl ListQuery {
    fn into_filter(self) -> Result<(SubscriptionFilter, Option<SortKey>), ApiError> {
        let mut filter = SubscriptionFilter {
            search: self.search,
            category: self.category,
            ..Default::default()
        };

        if let Some(raw) = self.cost_range {
            for token in comma_separated(&raw) {
                let bucket =
                    CostBucket::try_from(token).map_err(|e| ApiError::field("costRange", e))?;
                filter.cost_buckets.push(bucket);
            }
        }

        if let Some(raw) = self.status {
            for token in comma_separated(&raw) {
                let status = SubscriptionStatus::try_from(token.to_string())
                    .map_err(|e| ApiError::field("status", e))?;
                filter.statuses.push(status);
            }
        }

        if let Some(raw) = self.renewal {
            let window =
                RenewalWindow::try_from(raw.as_str()).map_err(|e| ApiError::field("renewal", e))?;
            filter.renewal_window = Some(window);
        }

        let sort = self
            .sort
            .map(|raw| SortKey::try_from(raw.as_str()).map_err(|e| ApiError::field("sort", e)))
            .transpose()?;

        Ok((filter, sort))
    }
}

fn comma_separated(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|t| !t.is_empty())
}

#[derive(Debug, Deserialize)]
struct ExpiringQuery {
    days: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateSubscriptionPayload {
    #[validate(custom = "crate::domain::service_name::validate_service_name")]
    name: String,
    category: Option<String>,
    #[validate(regex(
        path = "crate::domain::cost::COST_RE",
        message = "must be a decimal amount such as `15.99`"
    ))]
    cost: String,
    billing_cycle: BillingCycle,
    #[serde(with = "crate::domain::date_format")]
    renewal_date: Date,
    #[serde(default, with = "crate::domain::date_format::option")]
    expiration_date: Option<Date>,
    status: SubscriptionStatus,
    logo_url: Option<String>,
    description: Option<String>,
}

impl TryFrom<CreateSubscriptionPayload> for NewSubscription {
    type Error = ApiError;

    fn try_from(payload: CreateSubscriptionPayload) -> Result<Self, Self::Error> {
        Ok(NewSubscription {
            name: ServiceName::parse(payload.name).map_err(|e| ApiError::field("name", e))?,
            category: payload.category,
            cost: Cost::parse(payload.cost).map_err(|e| ApiError::field("cost", e))?,
            billing_cycle: payload.billing_cycle,
            renewal_date: payload.renewal_date,
            expiration_date: payload.expiration_date,
            status: payload.status,
            logo_url: payload.logo_url,
            description: payload.description,
        })
    }
}

/// Absent fields stay untouched; `null` is treated the same as absent, so
/// a patch cannot clear an optional field.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
struct UpdateSubscriptionPayload {
    #[validate(custom = "crate::domain::service_name::validate_service_name")]
    name: Option<String>,
    category: Option<String>,
    #[validate(regex(
        path = "crate::domain::cost::COST_RE",
        message = "must be a decimal amount such as `15.99`"
    ))]
    cost: Option<String>,
    billing_cycle: Option<BillingCycle>,
    #[serde(with = "crate::domain::date_format::option")]
    renewal_date: Option<Date>,
    #[serde(with = "crate::domain::date_format::option")]
    expiration_date: Option<Date>,
    status: Option<SubscriptionStatus>,
    logo_url: Option<String>,
    description: Option<String>,
}

impl TryFrom<UpdateSubscriptionPayload> for SubscriptionPatch {
    type Error = ApiError;

    fn try_from(payload: UpdateSubscriptionPayload) -> Result<Self, Self::Error> {
        let name = payload
            .name
            .map(|n| ServiceName::parse(n).map_err(|e| ApiError::field("name", e)))
            .transpose()?;
        let cost = payload
            .cost
            .map(|c| Cost::parse(c).map_err(|e| ApiError::field("cost", e)))
            .transpose()?;

        Ok(SubscriptionPatch {
            name,
            category: payload.category,
            cost,
            billing_cycle: payload.billing_cycle,
            renewal_date: payload.renewal_date,
            expiration_date: payload.expiration_date,
            status: payload.status,
            logo_url: payload.logo_url,
            description: payload.description,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct SubscribePayload {
    service_id: Uuid,
    plan_id: Uuid,
}
