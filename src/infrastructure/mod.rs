//! Infrastructure layer: platform-specific utilities.
//!
//! Currently just path resolution for the config file and the persisted
//! session token.

pub mod paths;

pub use paths::{config_dir, data_dir, default_config_file, default_token_file};
