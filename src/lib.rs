pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod external;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
