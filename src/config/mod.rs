use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

use crate::hierarchy::{ParentScope, RootSentinel};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub hierarchy: HierarchyConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub auth_url: String,
    pub timeout_secs: u64,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyConfig {
    pub root_sentinel: RootSentinel,
    pub parent_scope: ParentScope,
}

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api/v1";
const DEFAULT_AUTH_URL: &str = "http://127.0.0.1:8000/api/auth";

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("AUDITLIB_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Ok(v) = env::var("AUDITLIB_API_URL") {
            self.api.base_url = v;
        }
        if let Ok(v) = env::var("AUDITLIB_AUTH_URL") {
            self.api.auth_url = v;
        }
        if let Ok(v) = env::var("AUDITLIB_TIMEOUT_SECS") {
            self.api.timeout_secs = v.parse().unwrap_or(self.api.timeout_secs);
        }
        if let Ok(v) = env::var("AUDITLIB_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        // Hierarchy overrides
        if let Ok(v) = env::var("AUDITLIB_ROOT_SENTINEL") {
            match v.parse() {
                Ok(sentinel) => self.hierarchy.root_sentinel = sentinel,
                Err(e) => tracing::warn!("Ignoring AUDITLIB_ROOT_SENTINEL: {}", e),
            }
        }
        if let Ok(v) = env::var("AUDITLIB_PARENT_SCOPE") {
            match v.parse() {
                Ok(scope) => self.hierarchy.parent_scope = scope,
                Err(e) => tracing::warn!("Ignoring AUDITLIB_PARENT_SCOPE: {}", e),
            }
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: DEFAULT_API_URL.to_string(),
                auth_url: DEFAULT_AUTH_URL.to_string(),
                timeout_secs: 30,
                enable_request_logging: true,
            },
            hierarchy: HierarchyConfig {
                root_sentinel: RootSentinel::Null,
                parent_scope: ParentScope::AnyNonDescendant,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: DEFAULT_API_URL.to_string(),
                auth_url: DEFAULT_AUTH_URL.to_string(),
                timeout_secs: 15,
                enable_request_logging: true,
            },
            hierarchy: HierarchyConfig {
                root_sentinel: RootSentinel::Null,
                parent_scope: ParentScope::RootsOnly,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: DEFAULT_API_URL.to_string(),
                auth_url: DEFAULT_AUTH_URL.to_string(),
                timeout_secs: 10,
                enable_request_logging: false,
            },
            hierarchy: HierarchyConfig {
                root_sentinel: RootSentinel::Null,
                parent_scope: ParentScope::RootsOnly,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
