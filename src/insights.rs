//! Derived values computed over a user's subscription list: spend totals,
//! renewal alerts and the filter/sort pipeline. Everything here is pure;
//! callers pass `today` in so the arithmetic stays testable.

use crate::domain::{date_format, ServiceName, Subscription, SubscriptionStatus};
use serde::Serialize;
use time::Date;
use uuid::Uuid;

pub const EXPIRING_SOON_DAYS: i64 = 30;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendMetrics {
    pub monthly_total: f64,
    pub annual_total: f64,
    pub active_count: usize,
    pub expiring_soon_count: usize,
}

impl SpendMetrics {
    pub fn compute(subscriptions: &[Subscription], today: Date) -> Self {
        let active: Vec<_> = subscriptions
            .iter()
            .filter(|s| s.status == SubscriptionStatus::Active)
            .collect();

        let monthly_total: f64 = active.iter().map(|s| s.monthly_amount()).sum();
        let expiring_soon_count = active
            .iter()
            .filter(|s| {
                let days = days_until(s.renewal_date, today);
                (0..=EXPIRING_SOON_DAYS).contains(&days)
            })
            .count();

        Self {
            monthly_total: round_cents(monthly_total),
            annual_total: round_cents(monthly_total * 12.0),
            active_count: active.len(),
            expiring_soon_count,
        }
    }
}

trait NormalizedCost {
    fn monthly_amount(&self) -> f64;
}

impl NormalizedCost for Subscription {
    fn monthly_amount(&self) -> f64 {
        match self.billing_cycle {
            crate::domain::BillingCycle::Monthly => self.cost.amount(),
            crate::domain::BillingCycle::Annual => self.cost.amount() / 12.0,
        }
    }
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

fn days_until(date: Date, today: Date) -> i64 {
    (date - today).whole_days()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Critical,
    Warning,
    Info,
}

impl Urgency {
    /// Display-only classification; renewals past due or beyond 30 days
    /// produce no alert at all.
    fn from_days_remaining(days: i64) -> Option<Self> {
        match days {
            0..=3 => Some(Urgency::Critical),
            4..=7 => Some(Urgency::Warning),
            8..=EXPIRING_SOON_DAYS => Some(Urgency::Info),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewalAlert {
    pub subscription_id: Uuid,
    pub name: ServiceName,
    #[serde(with = "date_format")]
    pub renewal_date: Date,
    pub days_remaining: i64,
    pub urgency: Urgency,
}

pub fn renewal_alerts(subscriptions: &[Subscription], today: Date) -> Vec<RenewalAlert> {
    let mut alerts: Vec<_> = subscriptions
        .iter()
        .filter(|s| s.status == SubscriptionStatus::Active)
        .filter_map(|s| {
            let days_remaining = days_until(s.renewal_date, today);
            Urgency::from_days_remaining(days_remaining).map(|urgency| RenewalAlert {
                subscription_id: s.id,
                name: s.name.clone(),
                renewal_date: s.renewal_date,
                days_remaining,
                urgency,
            })
        })
        .collect();

    alerts.sort_by(|a, b| {
        a.days_remaining
            .cmp(&b.days_remaining)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });

    alerts
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub metrics: SpendMetrics,
    pub renewal_alerts: Vec<RenewalAlert>,
}

pub fn dashboard_summary(subscriptions: &[Subscription], today: Date) -> DashboardSummary {
    DashboardSummary {
        metrics: SpendMetrics::compute(subscriptions, today),
        renewal_alerts: renewal_alerts(subscriptions, today),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CostBucket {
    Under10,
    From10To25,
    From25To50,
    Over50,
}

impl CostBucket {
    fn contains(&self, amount: f64) -> bool {
        match self {
            CostBucket::Under10 => amount < 10.0,
            CostBucket::From10To25 => (10.0..25.0).contains(&amount),
            CostBucket::From25To50 => (25.0..50.0).contains(&amount),
            CostBucket::Over50 => amount >= 50.0,
        }
    }
}

impl TryFrom<&str> for CostBucket {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "under-10" => Ok(CostBucket::Under10),
            "10-25" => Ok(CostBucket::From10To25),
            "25-50" => Ok(CostBucket::From25To50),
            "over-50" => Ok(CostBucket::Over50),
            other => Err(format!(
                "`{other}` is not a valid cost range. \
                Use one of `under-10`, `10-25`, `25-50`, `over-50`."
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenewalWindow {
    Days7,
    Days30,
    Days90,
}

impl RenewalWindow {
    fn days(&self) -> i64 {
        match self {
            RenewalWindow::Days7 => 7,
            RenewalWindow::Days30 => 30,
            RenewalWindow::Days90 => 90,
        }
    }
}

impl TryFrom<&str> for RenewalWindow {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "7-days" => Ok(RenewalWindow::Days7),
            "30-days" => Ok(RenewalWindow::Days30),
            "90-days" => Ok(RenewalWindow::Days90),
            other => Err(format!(
                "`{other}` is not a valid renewal window. \
                Use one of `7-days`, `30-days`, `90-days`."
            )),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SubscriptionFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub cost_buckets: Vec<CostBucket>,
    pub statuses: Vec<SubscriptionStatus>,
    pub renewal_window: Option<RenewalWindow>,
}

impl SubscriptionFilter {
    pub fn matches(&self, subscription: &Subscription, today: Date) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let name_matches = subscription.name.to_lowercase().contains(&needle);
            let description_matches = subscription
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !name_matches && !description_matches {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if subscription.category.as_deref() != Some(category.as_str()) {
                return false;
            }
        }

        if !self.cost_buckets.is_empty() {
            let amount = subscription.cost.amount();
            if !self.cost_buckets.iter().any(|b| b.contains(amount)) {
                return false;
            }
        }

        if !self.statuses.is_empty() && !self.statuses.contains(&subscription.status) {
            return false;
        }

        if let Some(window) = &self.renewal_window {
            let days = days_until(subscription.renewal_date, today);
            if !(0..=window.days()).contains(&days) {
                return false;
            }
        }

        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Cost,
    RenewalDate,
}

impl TryFrom<&str> for SortKey {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "name" => Ok(SortKey::Name),
            "cost" => Ok(SortKey::Cost),
            "renewal-date" => Ok(SortKey::RenewalDate),
            other => Err(format!(
                "`{other}` is not a valid sort key. \
                Use one of `name`, `cost`, `renewal-date`."
            )),
        }
    }
}

pub fn filter_and_sort(
    mut subscriptions: Vec<Subscription>,
    filter: &SubscriptionFilter,
    sort: Option<SortKey>,
    today: Date,
) -> Vec<Subscription> {
    subscriptions.retain(|s| filter.matches(s, today));

    match sort {
        Some(SortKey::Name) => {
            subscriptions.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        }
        Some(SortKey::Cost) => {
            subscriptions.sort_by(|a, b| a.cost.amount().total_cmp(&b.cost.amount()));
        }
        Some(SortKey::RenewalDate) => {
            subscriptions.sort_by(|a, b| a.renewal_date.cmp(&b.renewal_date));
        }
        None => {}
    }

    subscriptions
}
