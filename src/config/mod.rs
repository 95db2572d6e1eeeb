//! Configuration loading and validation
//!
//! Tuning lives in a TOML file; credentials are overlaid from the process
//! environment at startup. The resulting [`Config`] is immutable for the
//! lifetime of the process.

mod loader;
mod types;
mod validation;

pub use loader::{load, load_config};
pub use types::{
    BackoffPolicy, Config, DiscoveryConfig, FetchConfig, InstantSourceConfig, LlmSourceConfig,
    PipelineConfig, SerperSourceConfig, ServerConfig,
};
pub use validation::validate;
