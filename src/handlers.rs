pub mod auth;
pub mod costs;
pub mod dashboard;
pub mod goals;
pub mod insights;
pub mod inventory;
pub mod logs;
pub mod products;
pub mod sales;
pub mod suppliers;
