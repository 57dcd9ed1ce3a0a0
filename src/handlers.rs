pub mod catalog;
pub mod compliance;
pub mod directory;
pub mod employees;
pub mod plans;
pub mod suppliers;
