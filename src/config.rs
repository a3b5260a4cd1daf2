/// Service configuration, loaded from `climcor.toml`.
///
/// Every field has a compiled-in default matching the original deployment
/// (CSV paths under `data/`, public Nominatim, port 8080), so the service
/// runs with no config file at all. A partial file overrides only the keys
/// it names.

use serde::Deserialize;
use std::error::Error;
use std::path::Path;

/// Default location of the config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "climcor.toml";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub geocoder: GeocoderConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig { port: 8080 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// IMF annual surface temperature change CSV (wide or long form).
    pub surface_temperature_csv: String,
    /// NASA land-ocean temperature index CSV (must carry a Year column).
    pub ocean_index_csv: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            surface_temperature_csv: "data/Annual_Surface_Temperature_Change.csv".to_string(),
            ocean_index_csv: "data/Land_Ocean_Temperature_Index.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,
    /// Total attempts per lookup when the request times out (>= 1).
    pub max_attempts: u32,
    /// Fixed delay between retry attempts, in seconds.
    pub retry_delay_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        GeocoderConfig {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "climate-impact-analyzer".to_string(),
            timeout_secs: 10,
            max_attempts: 3,
            retry_delay_secs: 2,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file. A missing file is not an
    /// error — the defaults apply. A present but malformed file is.
    pub fn load(path: &str) -> Result<Config, Box<dyn Error>> {
        if !Path::new(path).exists() {
            return Ok(Config::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_deployment() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(
            config.data.surface_temperature_csv,
            "data/Annual_Surface_Temperature_Change.csv"
        );
        assert_eq!(
            config.data.ocean_index_csv,
            "data/Land_Ocean_Temperature_Index.csv"
        );
        assert_eq!(config.geocoder.base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.geocoder.user_agent, "climate-impact-analyzer");
        assert_eq!(config.geocoder.timeout_secs, 10);
        assert_eq!(config.geocoder.max_attempts, 3);
        assert_eq!(config.geocoder.retry_delay_secs, 2);
    }

    #[test]
    fn test_partial_file_keeps_defaults_for_omitted_keys() {
        let toml_str = r#"
            [server]
            port = 9090

            [geocoder]
            max_attempts = 5
        "#;
        let config: Config = toml::from_str(toml_str).expect("partial config should parse");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.geocoder.max_attempts, 5);
        // untouched sections and keys fall back to defaults
        assert_eq!(config.geocoder.retry_delay_secs, 2);
        assert_eq!(
            config.data.ocean_index_csv,
            "data/Land_Ocean_Temperature_Index.csv"
        );
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let config = Config::load("definitely/does/not/exist.toml")
            .expect("missing file should fall back to defaults");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let result: Result<Config, _> = toml::from_str("server = \"not a table\"");
        assert!(result.is_err(), "malformed config should fail to parse");
    }
}
