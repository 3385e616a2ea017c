use super::{BillingCycle, Cost, ServiceName};
use serde::Serialize;
use uuid::Uuid;

/// Catalog entry users can one-click subscribe to. Seeded out-of-band and
/// never mutated through the API.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableService {
    pub id: Uuid,
    pub name: ServiceName,
    pub category: String,
    pub logo_url: String,
    pub description: String,
    pub base_price: Cost,
    pub plans: Vec<ServicePlan>,
    pub is_popular: bool,
    pub features: Vec<String>,
    pub launch_url: Option<String>,
}

impl AvailableService {
    pub fn plan(&self, plan_id: Uuid) -> Option<&ServicePlan> {
        self.plans.iter().find(|plan| plan.id == plan_id)
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePlan {
    pub id: Uuid,
    pub name: String,
    pub price: Cost,
    pub billing_cycle: BillingCycle,
    pub features: Vec<String>,
}
