/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, APP_ENV, authz 関連など)
 * - 設定値のバリデーション (不正なら起動失敗)
 */
use std::collections::HashMap;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Invalid(&'static str),
    ReportOnlyInProduction,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
            ConfigError::ReportOnlyInProduction => {
                write!(f, "AUTHZ_REPORT_ONLY cannot be enabled when APP_ENV=production")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// bearer token -> granted privileges
pub type TokenTable = HashMap<String, Vec<String>>;

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // main.rs だけが report-only を有効化できる (authz::set_report_only の gate)
    pub authz_report_only: bool,
    pub authz_tokens: TokenTable,

    pub request_timeout_seconds: u64,
    pub request_body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let authz_report_only = match std::env::var("AUTHZ_REPORT_ONLY") {
            Ok(v) => parse_bool(&v).ok_or(ConfigError::Invalid("AUTHZ_REPORT_ONLY"))?,
            Err(_) => false,
        };
        if authz_report_only && app_env.is_production() {
            return Err(ConfigError::ReportOnlyInProduction);
        }

        let authz_tokens = parse_token_table(&std::env::var("AUTHZ_TOKENS").unwrap_or_default())?;

        let request_timeout_seconds = std::env::var("REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let request_body_limit_bytes = std::env::var("REQUEST_BODY_LIMIT_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(1024 * 1024);

        Ok(Self {
            addr,
            app_env,
            authz_report_only,
            authz_tokens,
            request_timeout_seconds,
            request_body_limit_bytes,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            app_env: AppEnv::Development,
            authz_report_only: false,
            authz_tokens: TokenTable::new(),
            request_timeout_seconds: 30,
            request_body_limit_bytes: 1024 * 1024,
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Parses `AUTHZ_TOKENS`.
///
/// Format: `token=priv,priv;token2=priv`. A token with nothing after `=` is
/// granted an empty privilege list. Duplicate tokens are rejected.
pub fn parse_token_table(raw: &str) -> Result<TokenTable, ConfigError> {
    let mut table = TokenTable::new();

    for entry in raw.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let (token, privileges) = entry
            .split_once('=')
            .ok_or(ConfigError::Invalid("AUTHZ_TOKENS"))?;

        let token = token.trim();
        if token.is_empty() {
            return Err(ConfigError::Invalid("AUTHZ_TOKENS"));
        }

        let privileges = privileges
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        if table.insert(token.to_string(), privileges).is_some() {
            return Err(ConfigError::Invalid("AUTHZ_TOKENS"));
        }
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_token_table() {
        let table = parse_token_table(" alice=posts:read, posts:write ; bob=posts:read;guest=").unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table["alice"], vec!["posts:read", "posts:write"]);
        assert_eq!(table["bob"], vec!["posts:read"]);
        assert!(table["guest"].is_empty());
    }

    #[test]
    fn empty_token_table_is_ok() {
        assert!(parse_token_table("").unwrap().is_empty());
        assert!(parse_token_table(" ; ").unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed_token_table() {
        for raw in ["alice", "=posts:read", "a=x;a=y"] {
            assert_eq!(
                parse_token_table(raw),
                Err(ConfigError::Invalid("AUTHZ_TOKENS")),
                "{raw}"
            );
        }
    }

    #[test]
    fn parses_bools() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" 1 "), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn config_errors_name_the_key() {
        assert_eq!(
            ConfigError::Invalid("AUTHZ_TOKENS").to_string(),
            "invalid configuration: AUTHZ_TOKENS"
        );
        assert_eq!(
            ConfigError::ReportOnlyInProduction.to_string(),
            "AUTHZ_REPORT_ONLY cannot be enabled when APP_ENV=production"
        );
    }

    #[test]
    fn parses_app_env() {
        assert_eq!(AppEnv::parse("PROD"), AppEnv::Production);
        assert_eq!(AppEnv::parse("staging"), AppEnv::Development);
    }
}
