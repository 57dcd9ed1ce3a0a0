pub mod auth;
pub mod catalog;
pub mod compliance;
pub mod employee;
pub mod plan;
pub mod supplier;
