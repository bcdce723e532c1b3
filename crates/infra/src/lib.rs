//! Infrastructure layer: entity store, filters, services, scheduled jobs and config.

pub mod config;
pub mod filters;
pub mod jobs;
pub mod query;
pub mod services;
pub mod store;
