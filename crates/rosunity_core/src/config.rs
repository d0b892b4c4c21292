use std::env;
use std::time::Duration;

use crate::error::{CoreError, Result};

pub const DEFAULT_TICK_RATE: f32 = 10.0;
pub const DEFAULT_SPIN_TIMEOUT: Duration = Duration::from_millis(500);
pub const DEFAULT_SPIN_DELAY: Duration = Duration::from_millis(1);

pub const ENV_TICK_RATE: &str = "ROSUNITY_TICK_RATE";
pub const ENV_SPIN_TIMEOUT_MS: &str = "ROSUNITY_SPIN_TIMEOUT_MS";
pub const ENV_SPIN_DELAY_MS: &str = "ROSUNITY_SPIN_DELAY_MS";

/// Adapter settings.
///
/// `tick_rate` only seeds the adapter's stored tick rate; the poll loop is driven
/// by `spin_timeout` (upper bound of one processing step) and `spin_delay`
/// (pause between steps).
#[derive(Debug, Clone, PartialEq)]
pub struct HelperConfig {
    pub tick_rate: f32,
    pub spin_timeout: Duration,
    pub spin_delay: Duration,
}

impl Default for HelperConfig {
    fn default() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            spin_timeout: DEFAULT_SPIN_TIMEOUT,
            spin_delay: DEFAULT_SPIN_DELAY,
        }
    }
}

impl HelperConfig {
    /// Defaults overridden by `ROSUNITY_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `ROSUNITY_*` key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_TICK_RATE) {
            config.tick_rate = value
                .trim()
                .parse()
                .map_err(|_| CoreError::invalid_config(ENV_TICK_RATE, value.clone()))?;
        }
        if let Some(value) = lookup(ENV_SPIN_TIMEOUT_MS) {
            config.spin_timeout = parse_millis(ENV_SPIN_TIMEOUT_MS, value)?;
        }
        if let Some(value) = lookup(ENV_SPIN_DELAY_MS) {
            config.spin_delay = parse_millis(ENV_SPIN_DELAY_MS, value)?;
        }

        Ok(config)
    }

    pub fn with_tick_rate(mut self, tick_rate: f32) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    pub fn with_spin_timeout(mut self, timeout: Duration) -> Self {
        self.spin_timeout = timeout;
        self
    }

    pub fn with_spin_delay(mut self, delay: Duration) -> Self {
        self.spin_delay = delay;
        self
    }
}

fn parse_millis(key: &'static str, value: String) -> Result<Duration> {
    match value.trim().parse::<u64>() {
        Ok(ms) => Ok(Duration::from_millis(ms)),
        Err(_) => Err(CoreError::invalid_config(key, value)),
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
    fn defaults_match_poll_loop_constants() {
        let config = HelperConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, HelperConfig::default());
        assert_eq!(config.tick_rate, 10.0);
        assert_eq!(config.spin_timeout, Duration::from_millis(500));
        assert_eq!(config.spin_delay, Duration::from_millis(1));
    }

    #[test]
    fn overrides_are_applied() {
        let config = HelperConfig::from_lookup(lookup_from(&[
            (ENV_TICK_RATE, "30"),
            (ENV_SPIN_TIMEOUT_MS, " 100 "),
            (ENV_SPIN_DELAY_MS, "5"),
        ]))
        .unwrap();

        assert_eq!(config.tick_rate, 30.0);
        assert_eq!(config.spin_timeout, Duration::from_millis(100));
        assert_eq!(config.spin_delay, Duration::from_millis(5));
    }

    #[test]
    fn unparsable_value_is_reported() {
        let err = HelperConfig::from_lookup(lookup_from(&[(ENV_SPIN_DELAY_MS, "soon")]))
            .unwrap_err();
        assert!(err.message.contains(ENV_SPIN_DELAY_MS));
    }

    #[test]
    fn tick_rate_is_not_validated() {
        let config = HelperConfig::from_lookup(lookup_from(&[(ENV_TICK_RATE, "-2.5")])).unwrap();
        assert_eq!(config.tick_rate, -2.5);
    }
}
