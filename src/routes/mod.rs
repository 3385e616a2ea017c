pub mod auth;
pub mod available_services;
pub mod dashboard;
pub mod health_check;
pub mod subscriptions;
pub mod users;
