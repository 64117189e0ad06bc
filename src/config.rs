use std::{env, num::NonZeroU32, str::FromStr, time::Duration};

use crate::error::{Error, Result};
use crate::locations::Site;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub site: Site,
    pub fetch_timeout: Duration,
    pub rate_limit: NonZeroU32,
    pub rate_jitter: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            site: Site::default(),
            fetch_timeout: Duration::from_secs(15),
            rate_limit: NonZeroU32::new(20).unwrap_or(NonZeroU32::MIN),
            rate_jitter: Duration::from_secs(2),
        }
    }
}

impl Config {
    /// Reads `HOST`, `PORT`, `FOODPRO_URL`, `FETCH_TIMEOUT_SECS`,
    /// `RATE_LIMIT` and `RATE_JITTER_MS`; unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(host) = lookup("HOST") {
            config.host = host;
        }
        if let Some(port) = parsed(&lookup, "PORT")? {
            config.port = port;
        }
        match lookup("FOODPRO_URL") {
            Some(url) => config.site = Site::new(&url)?,
            None => log::warn!(
                "env var FOODPRO_URL not set, using {}",
                config.site.base()
            ),
        }
        if let Some(secs) = parsed(&lookup, "FETCH_TIMEOUT_SECS")? {
            config.fetch_timeout = Duration::from_secs(secs);
        }
        if let Some(limit) = parsed(&lookup, "RATE_LIMIT")? {
            config.rate_limit = limit;
        }
        if let Some(ms) = parsed(&lookup, "RATE_JITTER_MS")? {
            config.rate_jitter = Duration::from_millis(ms);
        }
        Ok(config)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>> {
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("{key} has an invalid value: {value:?}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr(), "127.0.0.1:3000");
        assert_eq!(config.fetch_timeout, Duration::from_secs(15));
        assert_eq!(config.rate_limit.get(), 20);
        assert_eq!(
            config.site.base().as_str(),
            "https://www.foodpro.huds.harvard.edu/foodpro/"
        );
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
            ("FOODPRO_URL", "http://localhost:9000/foodpro"),
            ("FETCH_TIMEOUT_SECS", "3"),
            ("RATE_LIMIT", "5"),
            ("RATE_JITTER_MS", "0"),
        ]))
        .unwrap();
        assert_eq!(config.addr(), "0.0.0.0:8080");
        assert_eq!(config.site.base().as_str(), "http://localhost:9000/foodpro/");
        assert_eq!(config.fetch_timeout, Duration::from_secs(3));
        assert_eq!(config.rate_limit.get(), 5);
        assert!(config.rate_jitter.is_zero());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            Config::from_lookup(lookup(&[("PORT", "eighty")])),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("RATE_LIMIT", "0")])),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("FOODPRO_URL", "::")])),
            Err(Error::Parse(_))
        ));
    }
}
