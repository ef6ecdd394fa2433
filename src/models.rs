pub mod audit;
pub mod auth;
pub mod cost;
pub mod dashboard;
pub mod goal;
pub mod insight;
pub mod product;
pub mod sale;
pub mod supplier;
