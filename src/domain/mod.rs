mod available_service;
mod billing_cycle;
pub mod cost;
pub mod date_format;
mod renewal;
mod service_launch;
pub mod service_name;
mod subscription;
mod subscription_status;
mod user;
mod user_email;
pub mod user_name;

pub use available_service::{AvailableService, ServicePlan};
pub use billing_cycle::BillingCycle;
pub use cost::Cost;
pub use renewal::next_renewal_date;
pub use service_launch::{LaunchStats, ServiceLaunch};
pub use service_name::ServiceName;
pub use subscription::{NewSubscription, Subscription, SubscriptionPatch};
pub use subscription_status::SubscriptionStatus;
pub use user::User;
pub use user_email::UserEmail;
pub use user_name::UserName;
