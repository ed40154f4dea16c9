//! Service configuration loaded from environment variables.
//!
//! | Variable                   | Default   |
//! |----------------------------|-----------|
//! | `HOST`                     | `0.0.0.0` |
//! | `PORT`                     | `8080`    |
//! | `AUTH_TOKEN`               | unset     |
//! | `REQUEST_TIMEOUT_SECS`     | `10`      |
//! | `HEADER_READ_TIMEOUT_SECS` | `10`      |
//! | `LOG_FORMAT`               | `pretty`  |
//!
//! A variable that is set but does not parse is an error, not a fallback to
//! the default.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::error::Error;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err("expected `pretty` or `json`".to_owned()),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    /// When set, every route except `/health` requires this bearer token.
    pub auth_token: Option<String>,
    pub request_timeout: Duration,
    pub header_read_timeout: Duration,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080),
            auth_token: None,
            request_timeout: Duration::from_secs(10),
            header_read_timeout: Duration::from_secs(10),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let defaults = Self::default();

        let host: IpAddr = parse(&lookup, "HOST")?.unwrap_or(defaults.addr.ip());
        let port: u16 = parse(&lookup, "PORT")?.unwrap_or(defaults.addr.port());

        Ok(Self {
            addr: SocketAddr::new(host, port),
            auth_token: lookup("AUTH_TOKEN").filter(|t| !t.is_empty()),
            request_timeout: parse(&lookup, "REQUEST_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            header_read_timeout: parse(&lookup, "HEADER_READ_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.header_read_timeout),
            log_format: parse(&lookup, "LOG_FORMAT")?.unwrap_or(defaults.log_format),
        })
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<Option<T>, Error>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| Error::Config { key, reason: e.to_string(), value }),
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("request_timeout", &self.request_timeout)
            .field("header_read_timeout", &self.header_read_timeout)
            .field("log_format", &self.log_format)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, Error> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(cfg.auth_token, None);
        assert_eq!(cfg.request_timeout, Duration::from_secs(10));
        assert_eq!(cfg.log_format, LogFormat::Pretty);
    }

    #[test]
    fn reads_overrides() {
        let cfg = load(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "3000"),
            ("AUTH_TOKEN", "s3cret"),
            ("REQUEST_TIMEOUT_SECS", "2"),
            ("LOG_FORMAT", "JSON"),
        ])
        .unwrap();
        assert_eq!(cfg.addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(cfg.auth_token.as_deref(), Some("s3cret"));
        assert_eq!(cfg.request_timeout, Duration::from_secs(2));
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn empty_auth_token_disables_gate() {
        assert_eq!(load(&[("AUTH_TOKEN", "")]).unwrap().auth_token, None);
    }

    #[test]
    fn unparseable_port_is_an_error() {
        let err = load(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, Error::Config { key: "PORT", .. }));
        assert!(err.to_string().contains("\"eighty\""));
    }

    #[test]
    fn debug_redacts_token() {
        let cfg = load(&[("AUTH_TOKEN", "s3cret")]).unwrap();
        assert!(!format!("{cfg:?}").contains("s3cret"));
    }
}
