pub mod controller;
pub mod router;
pub mod service;

pub use router::init_settings_router;
pub use service::SettingsService;
