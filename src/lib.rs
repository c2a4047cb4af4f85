//! Stroke unit clinical records core library
//!
//! This module exports the record models, the clinical alert rule engine,
//! and the role-gated registry that ties them together.

pub mod alerts;
pub mod intake;
pub mod models;
pub mod registry;
pub mod roles;
pub mod seed;

/// Application settings
pub mod settings {
    use serde::Deserialize;

    #[derive(Debug, Clone, Deserialize)]
    pub struct Settings {
        #[serde(default = "default_log_filter")]
        pub log_filter: String,
        #[serde(default = "default_seed_demo_data")]
        pub seed_demo_data: bool,
    }

    fn default_log_filter() -> String {
        "info".into()
    }

    fn default_seed_demo_data() -> bool {
        true
    }

    /// Load settings from layered config files and environment variables.
    pub fn load() -> Result<Settings, config::ConfigError> {
        // Start with default settings, override with environment-specific
        // settings, then with STROKEUNIT_* environment variables.
        let env = std::env::var("STROKEUNIT_ENV").unwrap_or_else(|_| "development".into());
        config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(config::Environment::with_prefix("STROKEUNIT"))
            .build()?
            .try_deserialize()
    }
}
