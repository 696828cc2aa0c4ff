pub mod settings;
pub mod user;

pub use settings::{BridgeSettings, WaiterPolicy};
pub use user::{
    ConfigError, ConfigResult, load_settings, load_user_settings, parse_settings, user_config_path,
};
