pub mod auth;
pub mod clients;
pub mod documents;
pub mod reports;
pub mod roles;
pub mod stores;
pub mod transactions;
pub mod users;
