pub mod client_repo;
pub use client_repo::ClientRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
pub mod store_repo;
pub use store_repo::StoreRepository;
pub mod transaction_repo;
pub use transaction_repo::TransactionRepository;
pub mod rbac_repo;
pub use rbac_repo::RbacRepository;
