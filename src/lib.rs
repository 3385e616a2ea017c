pub mod app_state;
pub mod authentication;
pub mod catalog;
pub mod configuration;
pub mod domain;
pub mod errors;
pub mod extract;
pub mod insights;
pub mod request_id;
pub mod routes;
pub mod session_state;
pub mod startup;
pub mod storage;
pub mod telemetry;
