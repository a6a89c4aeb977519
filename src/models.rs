pub mod auth;
pub mod clients;
pub mod rbac;
pub mod reports;
pub mod stores;
pub mod transactions;
