pub mod analyze;
pub mod auth;
pub mod catalog;
pub mod checkout;
pub mod docs;
pub mod generate;
pub mod health;
pub mod metrics;
pub mod shopify;
pub mod swagger;
