//! Infrastructure layer
//!
//! This module contains external integrations and adapters.

mod aws;
mod config;
mod logging;

pub use aws::AwsRemote;
pub use config::{
    Config, ConfigError, CustomConfig, DEFAULT_REGION, DEFAULT_STAGE, NameRef, Overrides,
    ProviderConfig,
};
pub use logging::init_logging;
