// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Application Configuration
//!
//! Grounded on the teacher's `ConfigService`/`ObservabilityConfig` pattern
//! (`infrastructure/config/config_service.rs`): a typed, `serde`-derived
//! configuration tree with a `Default` impl, loaded through the `config`
//! crate from `config/default.toml` plus `DOCGEN_`-prefixed environment
//! overrides (spec §6 "Environment / configuration").

use doc_gen_domain::error::DocGenError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub dsn: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinationConfig {
    /// In-process for tests/single-node runs; a `redis://` URL is accepted
    /// at the config level but the Redis-shaped `CoordinationStore` is a
    /// collaborator only (spec §5) — not implemented in this crate.
    pub url: String,
    pub heartbeat_interval_secs: u64,
    pub heartbeat_ttl_secs: u64,
    pub recovery_lock_ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectStoreConfig {
    pub root: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationConfig {
    pub confidence_threshold: f64,
    pub use_llm: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub poll_interval_secs: u64,
    pub recovery_interval_secs: u64,
    pub stuck_threshold_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub coordination: CoordinationConfig,
    pub object_store: ObjectStoreConfig,
    pub llm: LlmConfig,
    pub classification: ClassificationConfig,
    pub scheduler: SchedulerConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                dsn: "sqlite://doc-gen.db".to_string(),
                max_connections: 10,
            },
            coordination: CoordinationConfig {
                url: "in-process".to_string(),
                heartbeat_interval_secs: 30,
                heartbeat_ttl_secs: 60,
                recovery_lock_ttl_secs: 60,
            },
            object_store: ObjectStoreConfig {
                root: "./object-store".to_string(),
            },
            llm: LlmConfig {
                api_key: None,
                endpoint: None,
            },
            classification: ClassificationConfig {
                confidence_threshold: 0.85,
                use_llm: false,
            },
            scheduler: SchedulerConfig {
                poll_interval_secs: 1,
                recovery_interval_secs: 300,
                stuck_threshold_secs: 1800,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json: false,
            },
            metrics: MetricsConfig {
                enabled: true,
                port: 9090,
            },
        }
    }
}

impl AppConfig {
    /// Loads `config/default.toml` (if present) layered with `DOCGEN_`
    /// environment variable overrides (e.g. `DOCGEN_DATABASE__DSN`). Falls
    /// back to `AppConfig::default()` fields for anything neither source
    /// sets.
    pub fn load() -> Result<Self, DocGenError> {
        let defaults = config::Config::try_from(&AppConfig::default())
            .map_err(|e| DocGenError::InvalidConfiguration(e.to_string()))?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("DOCGEN").separator("__"))
            .build()
            .map_err(|e| DocGenError::InvalidConfiguration(e.to_string()))?;

        settings
            .try_deserialize()
            .map_err(|e| DocGenError::InvalidConfiguration(e.to_string()))
    }
}
