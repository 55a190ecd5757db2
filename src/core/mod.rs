mod config;
pub mod logging;

pub use config::{AppConfig, DEFAULT_API_URL};
