//! Build-time configuration.
//!
//! The web build has no process environment at runtime, so the values are
//! captured with `option_env!` when the wasm bundle is compiled. Everything
//! else goes through [`AppConfig::from_lookup`], which takes the variable
//! source as a closure so it can be tested on the host.

use crate::error::ConfigError;
use crate::routes::RouteSet;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_BASE_PATH: &str = "/";

pub const ENV_API_URL: &str = "API_URL";
pub const ENV_BASE_URL: &str = "BASE_URL";
pub const ENV_ROUTE_SET: &str = "D2J_ROUTE_SET";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Backend API root, without a trailing slash.
    pub api_url: String,
    /// Path the app is served under; `/` or `/prefix` (no trailing slash).
    pub base_path: String,
    pub route_set: RouteSet,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            route_set: RouteSet::default(),
        }
    }
}

impl AppConfig {
    /// Reads `API_URL`, `BASE_URL` and `D2J_ROUTE_SET` through `lookup`.
    /// Unset or blank variables fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_url = match var(ENV_API_URL) {
            Some(v) => normalize_api_url(&v)?,
            None => DEFAULT_API_URL.to_string(),
        };
        let base_path = match var(ENV_BASE_URL) {
            Some(v) => normalize_base_path(&v)?,
            None => DEFAULT_BASE_PATH.to_string(),
        };
        let route_set = match var(ENV_ROUTE_SET) {
            Some(v) => v.parse()?,
            None => RouteSet::default(),
        };

        Ok(Self {
            api_url,
            base_path,
            route_set,
        })
    }

    /// Values baked in when the crate was compiled.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| {
            let v = match name {
                ENV_API_URL => option_env!("API_URL"),
                ENV_BASE_URL => option_env!("BASE_URL"),
                ENV_ROUTE_SET => option_env!("D2J_ROUTE_SET"),
                _ => None,
            };
            v.map(str::to_string)
        })
    }

    pub fn log_startup(&self) {
        tracing::info!(
            api_url = %self.api_url,
            base_path = %self.base_path,
            route_set = %self.route_set,
            "configuration loaded"
        );
    }
}

fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let lower = raw.to_ascii_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"));
    match rest {
        Some(host) if !host.trim_matches('/').is_empty() => {
            Ok(raw.trim_end_matches('/').to_string())
        }
        _ => Err(ConfigError::InvalidApiUrl(raw.to_string())),
    }
}

fn normalize_base_path(raw: &str) -> Result<String, ConfigError> {
    if !raw.starts_with('/') {
        return Err(ConfigError::InvalidBasePath(raw.to_string()));
    }
    let trimmed = raw.trim_end_matches('/');
    if trimmed.is_empty() {
        Ok(DEFAULT_BASE_PATH.to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.api_url, "http://localhost:8080/api");
        assert_eq!(cfg.base_path, "/");
        assert_eq!(cfg.route_set, RouteSet::Full);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let cfg = AppConfig::from_lookup(lookup(&[
            (ENV_API_URL, "  "),
            (ENV_BASE_URL, ""),
            (ENV_ROUTE_SET, "\t"),
        ]))
        .unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn overrides_are_normalized() {
        let cfg = AppConfig::from_lookup(lookup(&[
            (ENV_API_URL, "https://d2j.example.com/api/"),
            (ENV_BASE_URL, "/tools/d2j/"),
            (ENV_ROUTE_SET, "without-convert"),
        ]))
        .unwrap();
        assert_eq!(cfg.api_url, "https://d2j.example.com/api");
        assert_eq!(cfg.base_path, "/tools/d2j");
        assert_eq!(cfg.route_set, RouteSet::WithoutConvert);
    }

    #[test]
    fn root_base_path_stays_root() {
        let cfg = AppConfig::from_lookup(lookup(&[(ENV_BASE_URL, "///")])).unwrap();
        assert_eq!(cfg.base_path, "/");
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            AppConfig::from_lookup(lookup(&[(ENV_API_URL, "localhost:8080")])),
            Err(ConfigError::InvalidApiUrl("localhost:8080".to_string()))
        );
        assert_eq!(
            AppConfig::from_lookup(lookup(&[(ENV_API_URL, "http://")])),
            Err(ConfigError::InvalidApiUrl("http://".to_string()))
        );
        assert_eq!(
            AppConfig::from_lookup(lookup(&[(ENV_BASE_URL, "app")])),
            Err(ConfigError::InvalidBasePath("app".to_string()))
        );
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[(ENV_ROUTE_SET, "all")])),
            Err(ConfigError::UnknownRouteSet(_))
        ));
    }

    #[test]
    fn scheme_check_is_case_insensitive() {
        let cfg = AppConfig::from_lookup(lookup(&[(ENV_API_URL, "HTTP://Api.Local")])).unwrap();
        assert_eq!(cfg.api_url, "HTTP://Api.Local");
    }
}
