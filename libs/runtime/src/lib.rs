//! Process-level runtime helpers shared by the users server: layered
//! configuration, home directory resolution and logging bootstrap.

pub mod config;
pub mod home_dir;
pub mod logging;

pub use config::{
    default_logging_config, AppConfig, CliArgs, DatabaseConfig, LoggingConfig, Section,
    ServerConfig,
};
