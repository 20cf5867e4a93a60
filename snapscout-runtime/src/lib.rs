pub mod backend;
pub mod settings;

pub use backend::HttpBackend;
pub use settings::{Settings, SettingsError};
