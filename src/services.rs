pub mod advisory_service;
pub mod auth;
pub mod catalog_service;
pub mod dashboard_service;
pub mod finance_service;
pub mod goal_service;
pub mod inventory_service;
pub mod metrics;
pub mod pricing;
pub mod sales_service;
