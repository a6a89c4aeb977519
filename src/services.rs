pub mod access;
pub mod auth;
pub mod rbac_service;
pub mod report_service;
pub mod storage;
pub mod transaction_service;
