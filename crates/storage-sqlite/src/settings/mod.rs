//! SQLite storage for engine settings.

mod model;
mod repository;

pub use model::AppSettingDB;
pub use repository::SettingsRepository;
