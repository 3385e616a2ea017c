mod helpers;
mod marketplace;
mod subscriptions;
