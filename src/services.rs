pub mod auth;
pub mod catalog_service;
pub mod compliance_service;
pub mod lifecycle_service;
pub mod notification;
pub mod obfuscation_service;
pub mod plan_service;
pub mod rbac_service;
