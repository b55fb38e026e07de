use std::{fmt::Display, ops::RangeInclusive, str::FromStr};

use thiserror::Error;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8000;
const DATABASE_NAME: &str = "trip_planner";
const TOKEN_TTL_HOURS: i64 = 24;
const TOKEN_TTL_RANGE: RangeInclusive<i64> = 1..=8760;
// Bounds accepted by bcrypt::hash.
const BCRYPT_COST_RANGE: RangeInclusive<u32> = 4..=31;
const CORS_ORIGIN: &str = "http://localhost:3000";
const PAYMENT_SUCCESS_RATE: f64 = 0.95;
const CHAT_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub database_name: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub cors_origin: String,
    pub bcrypt_cost: u32,
    pub payment_success_rate: f64,
    pub chat_history_limit: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let payment_success_rate = in_range(
            "PAYMENT_SUCCESS_RATE",
            parse_or(&lookup, "PAYMENT_SUCCESS_RATE", PAYMENT_SUCCESS_RATE)?,
            0.0..=1.0,
        )?;
        let token_ttl_hours = in_range(
            "TOKEN_TTL_HOURS",
            parse_or(&lookup, "TOKEN_TTL_HOURS", TOKEN_TTL_HOURS)?,
            TOKEN_TTL_RANGE,
        )?;
        let bcrypt_cost = in_range(
            "BCRYPT_COST",
            parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            BCRYPT_COST_RANGE,
        )?;

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| HOST.to_string()),
            port: parse_or(&lookup, "PORT", PORT)?,
            mongodb_uri: required("MONGODB_URI")?,
            database_name: lookup("DATABASE_NAME").unwrap_or_else(|| DATABASE_NAME.to_string()),
            jwt_secret: required("JWT_SECRET")?,
            token_ttl_hours,
            cors_origin: lookup("CORS_ORIGIN").unwrap_or_else(|| CORS_ORIGIN.to_string()),
            bcrypt_cost,
            payment_success_rate,
            chat_history_limit: parse_or(&lookup, "CHAT_HISTORY_LIMIT", CHAT_HISTORY_LIMIT)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn in_range<T>(key: &'static str, value: T, range: RangeInclusive<T>) -> Result<T, ConfigError>
where
    T: PartialOrd + Display,
{
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("MONGODB_URI", "mongodb://localhost:27017"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.database_name, "trip_planner");
        assert_eq!(config.token_ttl_hours, 24);
        assert_eq!(config.cors_origin, "http://localhost:3000");
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert_eq!(config.payment_success_rate, 0.95);
        assert_eq!(config.chat_history_limit, 100);
    }

    #[test]
    fn test_missing_jwt_secret() {
        let err = AppConfig::from_lookup(lookup_from(&[(
            "MONGODB_URI",
            "mongodb://localhost:27017",
        )]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn test_blank_mongodb_uri_is_missing() {
        let err = AppConfig::from_lookup(lookup_from(&[("MONGODB_URI", "  "), ("JWT_SECRET", "s")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing("MONGODB_URI"));
    }

    #[test]
    fn test_invalid_port() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("MONGODB_URI", "mongodb://localhost:27017"),
            ("JWT_SECRET", "secret"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "PORT",
                value: "eighty".to_string()
            }
        );
    }

    #[test]
    fn test_success_rate_out_of_range() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("MONGODB_URI", "mongodb://localhost:27017"),
            ("JWT_SECRET", "secret"),
            ("PAYMENT_SUCCESS_RATE", "1.5"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PAYMENT_SUCCESS_RATE", .. }));
    }

    #[test]
    fn test_token_ttl_out_of_range() {
        for ttl in ["0", "-5", "100000"] {
            let err = AppConfig::from_lookup(lookup_from(&[
                ("MONGODB_URI", "mongodb://localhost:27017"),
                ("JWT_SECRET", "secret"),
                ("TOKEN_TTL_HOURS", ttl),
            ]))
            .unwrap_err();
            assert_eq!(
                err,
                ConfigError::Invalid {
                    key: "TOKEN_TTL_HOURS",
                    value: ttl.to_string()
                }
            );
        }
    }

    #[test]
    fn test_bcrypt_cost_out_of_range() {
        for cost in ["3", "32"] {
            let err = AppConfig::from_lookup(lookup_from(&[
                ("MONGODB_URI", "mongodb://localhost:27017"),
                ("JWT_SECRET", "secret"),
                ("BCRYPT_COST", cost),
            ]))
            .unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { key: "BCRYPT_COST", .. }));
        }
    }

    #[test]
    fn test_bounds_accepted() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("MONGODB_URI", "mongodb://localhost:27017"),
            ("JWT_SECRET", "secret"),
            ("TOKEN_TTL_HOURS", "1"),
            ("BCRYPT_COST", "31"),
        ]))
        .unwrap();
        assert_eq!(config.token_ttl_hours, 1);
        assert_eq!(config.bcrypt_cost, 31);
    }
}
