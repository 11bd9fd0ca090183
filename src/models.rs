use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;

use serde_derive::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationError};

pub type Color = palette::rgb::LinSrgb<u8>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("error parsing configuration: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("error serializing configuration: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

fn validate_multicast(group: &Ipv4Addr) -> Result<(), ValidationError> {
    if group.is_multicast() {
        Ok(())
    } else {
        Err(ValidationError::new("multicast"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct Bridge {
    /// Number of virtual lights created at startup
    #[validate(range(min = 1, max = 63))]
    pub lights: u32,
    /// Friendly name advertised in the device description
    #[validate(length(min = 1, max = 32))]
    pub name: String,
}

impl Default for Bridge {
    fn default() -> Self {
        Self {
            lights: 3,
            name: "Fake Hue Bridge".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct WebConfig {
    pub bind: IpAddr,
    #[validate(range(min = 1))]
    pub port: u16,
    /// Serve the CLIP v2 API next to the v1 API
    pub enable_v2: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8043,
            enable_v2: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    pub enable: bool,
    #[validate(custom(function = "validate_multicast"))]
    pub group: Ipv4Addr,
    #[validate(range(min = 1))]
    pub port: u16,
    /// Local interface the multicast group is joined on. Unspecified lets the system pick.
    pub interface: Ipv4Addr,
    /// Address embedded in search responses. Detected from the default route when unset.
    pub advertise_address: Option<IpAddr>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            enable: true,
            group: crate::discovery::SSDP_GROUP,
            port: crate::discovery::SSDP_PORT,
            interface: Ipv4Addr::UNSPECIFIED,
            advertise_address: None,
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    pub enable: bool,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    #[validate(nested)]
    pub bridge: Bridge,
    #[validate(nested)]
    pub web: WebConfig,
    #[validate(nested)]
    pub discovery: DiscoveryConfig,
    #[validate(nested)]
    pub monitor: MonitorConfig,
}

impl Config {
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub async fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let full = tokio::fs::read_to_string(path).await?;
        Self::from_toml(&full)
    }

    pub fn to_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_partial_config() {
        let config = Config::from_toml(
            r#"
            [bridge]
            lights = 5

            [web]
            port = 8080
            enable_v2 = false

            [discovery]
            advertise_address = "192.168.1.20"
            "#,
        )
        .expect("failed to parse config");

        assert_eq!(config.bridge.lights, 5);
        assert_eq!(config.bridge.name, "Fake Hue Bridge");
        assert_eq!(config.web.port, 8080);
        assert!(!config.web.enable_v2);
        assert!(config.discovery.enable);
        assert_eq!(config.discovery.port, 1900);
        assert_eq!(config.discovery.interface, Ipv4Addr::UNSPECIFIED);
        assert_eq!(
            config.discovery.advertise_address,
            Some("192.168.1.20".parse().unwrap())
        );
        assert!(!config.monitor.enable);
    }

    #[test]
    fn reject_unknown_fields() {
        assert!(matches!(
            Config::from_toml("[bridge]\nbulbs = 2\n"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn reject_invalid_values() {
        assert!(matches!(
            Config::from_toml("[bridge]\nlights = 0\n"),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            Config::from_toml("[discovery]\ngroup = \"192.168.1.1\"\n"),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn serialize_round_trip() {
        let mut config = Config::default();
        config.bridge.lights = 7;
        config.monitor.enable = true;

        let serialized = config.to_string().expect("failed to serialize config");
        assert_eq!(Config::from_toml(&serialized).unwrap(), config);
    }
}
