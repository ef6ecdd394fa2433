pub mod cost_repo;
pub mod goal_repo;
pub mod insight_repo;
pub mod log_repo;
pub mod product_repo;
pub mod sale_repo;
pub mod supplier_repo;
pub mod user_repo;

pub use cost_repo::CostRepository;
pub use goal_repo::GoalRepository;
pub use insight_repo::InsightRepository;
pub use log_repo::LogRepository;
pub use product_repo::ProductRepository;
pub use sale_repo::SaleRepository;
pub use supplier_repo::SupplierRepository;
pub use user_repo::UserRepository;
