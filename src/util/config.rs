use anyhow::{bail, Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use crate::util::constants::{self as setting, Floor};

/// Settings for one simulated scenario. Every key is optional in the json file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub num_elevators: usize,
    pub max_passengers: usize,
    pub num_floors: Floor,
    pub tick_period_ms: u64,
    /// Send inbound floors through the same checks as `request_stop`.
    pub strict_inbound_requests: bool,
    pub assignment_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            num_elevators: setting::DEFAULT_NUM_ELEVATORS,
            max_passengers: setting::DEFAULT_MAX_PASSENGERS,
            num_floors: setting::DEFAULT_NUM_FLOORS,
            tick_period_ms: setting::DEFAULT_TICK_PERIOD_MS,
            strict_inbound_requests: false,
            assignment_seed: None,
        }
    }
}

impl Config {
    /// Loads a configuration from a json file. Keys missing from the file keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open config file {}", path.display()))?;
        let config: Config = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_elevators == 0 {
            bail!("num_elevators must be at least 1");
        }
        if self.num_floors <= 0 {
            bail!("num_floors must be positive, got {}", self.num_floors);
        }
        if self.max_passengers == 0 {
            bail!("max_passengers must be at least 1");
        }
        Ok(())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    pub fn print(&self) {
        info!("Number of elevators: {}", self.num_elevators);
        info!("Number of floors: {}", self.num_floors);
        info!("Max passengers per elevator: {}", self.max_passengers);
        info!("Tick period: {} ms", self.tick_period_ms);
        info!("Strict inbound requests: {}", self.strict_inbound_requests);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_fills_missing_keys_with_defaults() {
        let config: Config = serde_json::from_str(r#"{ "num_elevators": 4 }"#).unwrap();
        assert_eq!(config.num_elevators, 4);
        assert_eq!(config.num_floors, setting::DEFAULT_NUM_FLOORS);
        assert_eq!(config.max_passengers, setting::DEFAULT_MAX_PASSENGERS);
        assert!(!config.strict_inbound_requests);
    }

    #[test]
    fn it_rejects_a_building_without_elevators() {
        let config = Config {
            num_elevators: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn it_accepts_the_defaults() {
        assert!(Config::default().validate().is_ok());
        assert_eq!(Config::default().tick_period(), Duration::from_secs(1));
    }

    #[test]
    fn it_reports_a_missing_file() {
        assert!(Config::load("/definitely/not/here.json").is_err());
    }
}
