//! Main application configuration
//!
//! This module defines the primary configuration structures for the
//! caro-rating service, including environment variable and TOML loading and
//! validation.

use crate::config::rating::{RankSettings, RatingSettings};
use crate::rank::{RankResolver, RankTable};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::sync::Arc;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub rating: RatingSettings,
    pub ranks: RankSettings,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "caro-rating".to_string(),
            log_level: "info".to_string(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| anyhow!("Invalid {} value: {}", key, value))
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // Service settings
        if let Some(name) = lookup("SERVICE_NAME") {
            config.service.name = name;
        }
        if let Some(log_level) = lookup("LOG_LEVEL") {
            config.service.log_level = log_level;
        }

        // Rating settings
        if let Some(k_factor) = lookup("CP_K_FACTOR") {
            config.rating.k_factor = parse_var("CP_K_FACTOR", &k_factor)?;
        }
        if let Some(swing) = lookup("CP_MINIMUM_SWING") {
            config.rating.minimum_swing = parse_var("CP_MINIMUM_SWING", &swing)?;
        }
        if let Some(initial) = lookup("CP_INITIAL_RATING") {
            config.rating.initial_rating = parse_var("CP_INITIAL_RATING", &initial)?;
        }
        if let Some(clamp) = lookup("CP_CLAMP_NON_NEGATIVE") {
            config.rating.clamp_non_negative = parse_var("CP_CLAMP_NON_NEGATIVE", &clamp)?;
        }
        if let Some(max_players) = lookup("CP_MAX_STORED_PLAYERS") {
            config.rating.max_stored_players = parse_var("CP_MAX_STORED_PLAYERS", &max_players)?;
        }

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; missing sections take defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Rank table from configuration, or the built-in ladder
    pub fn rank_table(&self) -> Result<Arc<RankTable>> {
        match &self.ranks.tiers {
            Some(tiers) => Ok(Arc::new(RankTable::new(tiers.clone())?)),
            None => Ok(RankTable::standard()),
        }
    }

    /// Resolver over the configured rank table
    pub fn rank_resolver(&self) -> Result<RankResolver> {
        Ok(RankResolver::new(self.rank_table()?))
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.trim().is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    // Validate rating settings
    config.rating.elo_config().validate()?;
    if config.rating.max_stored_players == 0 {
        return Err(anyhow!("Max stored players must be greater than 0"));
    }

    // Validate a custom rank ladder
    if let Some(tiers) = &config.ranks.tiers {
        RankTable::new(tiers.clone())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();

        assert!(validate_config(&config).is_ok());
        assert_eq!(config.rating.k_factor, 40.0);
        assert_eq!(config.rating.minimum_swing, 1);
        assert!(config.rating.clamp_non_negative);
        assert!(config.ranks.tiers.is_none());
    }

    #[test]
    fn test_from_vars_overrides() {
        let config = AppConfig::from_vars(vars(&[
            ("LOG_LEVEL", "debug"),
            ("CP_K_FACTOR", "32"),
            ("CP_MINIMUM_SWING", "2"),
            ("CP_INITIAL_RATING", "100"),
            ("CP_CLAMP_NON_NEGATIVE", "false"),
        ]))
        .unwrap();

        assert_eq!(config.service.log_level, "debug");
        assert_eq!(config.rating.k_factor, 32.0);
        assert_eq!(config.rating.minimum_swing, 2);
        assert_eq!(config.rating.initial_rating, 100);
        assert!(!config.rating.clamp_non_negative);
    }

    #[test]
    fn test_from_vars_rejects_garbage() {
        let err = AppConfig::from_vars(vars(&[("CP_K_FACTOR", "lots")])).unwrap_err();
        assert!(err.to_string().contains("CP_K_FACTOR"));

        assert!(AppConfig::from_vars(vars(&[("CP_K_FACTOR", "-3")])).is_err());
        assert!(AppConfig::from_vars(vars(&[("LOG_LEVEL", "loud")])).is_err());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = AppConfig::from_toml(
            r#"
            [rating]
            k_factor = 24.0
            "#,
        )
        .unwrap();

        assert_eq!(config.rating.k_factor, 24.0);
        assert_eq!(config.rating.minimum_swing, 1);
        assert_eq!(config.service.name, "caro-rating");
    }

    #[test]
    fn test_from_toml_custom_ranks() {
        let config = AppConfig::from_toml(
            r#"
            [[ranks.tiers]]
            name = "Rookie"
            sub_tier_count = 2
            min_rating = 0
            icon = "r"

            [[ranks.tiers]]
            name = "Legend"
            sub_tier_count = 0
            min_rating = 200
            icon = "l"
            "#,
        )
        .unwrap();

        let resolver = config.rank_resolver().unwrap();
        assert_eq!(resolver.resolve_cp(150).display_name, "Rookie I");
        assert_eq!(resolver.resolve_cp(200).display_name, "Legend");
    }

    #[test]
    fn test_from_toml_rejects_broken_ranks() {
        let result = AppConfig::from_toml(
            r#"
            [[ranks.tiers]]
            name = "Rookie"
            sub_tier_count = 2
            min_rating = 0
            icon = "r"

            [[ranks.tiers]]
            name = "Legend"
            sub_tier_count = 0
            min_rating = 150
            icon = "l"
            "#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_default_rank_table_is_standard() {
        let table = AppConfig::default().rank_table().unwrap();
        assert!(Arc::ptr_eq(&table, &RankTable::standard()));
    }
}
