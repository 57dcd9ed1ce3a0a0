pub mod settings_repo;
pub use settings_repo::SettingsRepository;
pub mod supplier_repo;
pub use supplier_repo::SupplierRepository;
