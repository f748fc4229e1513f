//! Configuration handling for the ie-dump tool.
//!
//! Reads the decoder switches from a YAML file and the environment and
//! turns them into a [`DecoderConfig`].

use anyhow::{anyhow, Context, Result};
use scan_security::{akm_to_key_management, DecoderConfig, KeyManagement};
use serde::Deserialize;
use std::path::Path;

/// Tool configuration
#[derive(Debug, Clone, Default)]
pub struct ToolConfig {
    /// Settings handed to the capability synthesizer
    pub decoder: DecoderConfig,
}

/// Root configuration structure (matches the YAML structure)
#[derive(Debug, Deserialize)]
struct RootConfig {
    decoder: Option<DecoderSection>,
}

#[derive(Debug, Deserialize)]
struct DecoderSection {
    owe_supported: Option<bool>,
    rsn_overriding_supported: Option<bool>,
    unknown_akm_mapping: Option<Vec<String>>,
}

impl ToolConfig {
    /// Load configuration from file and environment variables
    pub fn load_from_file<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let path = config_path.as_ref();
        let mut config = Self::default();

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str::<RootConfig>(&content) {
                Ok(root) => {
                    config.apply_root_config(root);
                    crate::component_info!("config", "Loaded configuration from {:?}", path);
                }
                Err(e) => {
                    crate::component_warn!(
                        "config",
                        "Failed to parse config file {:?} ({}), using defaults",
                        path,
                        e
                    );
                }
            },
            Err(_) => {
                crate::component_warn!("config", "Config file {:?} not found, using defaults", path);
            }
        }

        config.apply_environment_overrides();
        config.log_summary();
        Ok(config)
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_environment_overrides();
        config.log_summary();
        config
    }

    fn apply_root_config(&mut self, root: RootConfig) {
        let Some(decoder) = root.decoder else {
            return;
        };
        if let Some(owe) = decoder.owe_supported {
            self.decoder.owe_supported = owe;
        }
        if let Some(rsno) = decoder.rsn_overriding_supported {
            self.decoder.rsn_overriding_supported = rsno;
        }
        for entry in decoder.unknown_akm_mapping.unwrap_or_default() {
            match parse_akm_mapping(&entry) {
                Ok((unknown, scheme)) => {
                    self.decoder.unknown_akm_map.insert(unknown, scheme);
                }
                Err(e) => {
                    crate::component_warn!("config", "Ignoring AKM mapping {:?}: {:#}", entry, e);
                }
            }
        }
    }

    fn apply_environment_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("SCAN_OWE_SUPPORTED").and_then(|v| parse_flag(&v)) {
            self.decoder.owe_supported = value;
            crate::component_info!("config", "OWE support overridden by environment: {}", value);
        }

        if let Some(value) = lookup("SCAN_RSN_OVERRIDING_SUPPORTED").and_then(|v| parse_flag(&v)) {
            self.decoder.rsn_overriding_supported = value;
            crate::component_info!(
                "config",
                "RSN overriding support overridden by environment: {}",
                value
            );
        }
    }

    fn log_summary(&self) {
        crate::component_debug!(
            "config",
            "Decoder configuration: owe_supported={}, rsn_overriding_supported={}, unknown_akms={}",
            self.decoder.owe_supported,
            self.decoder.rsn_overriding_supported,
            self.decoder.unknown_akm_map.len()
        );
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

fn parse_selector(value: &str) -> Result<u32> {
    let value = value.trim();
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    u32::from_str_radix(digits, 16).with_context(|| format!("bad suite selector {:?}", value))
}

/// `"<unknown selector>,<known selector>"`, both hex
fn parse_akm_mapping(entry: &str) -> Result<(u32, KeyManagement)> {
    let (unknown, known) = entry
        .split_once(',')
        .ok_or_else(|| anyhow!("expected two comma separated selectors"))?;
    let unknown = parse_selector(unknown)?;
    let scheme = akm_to_key_management(parse_selector(known)?);
    if scheme == KeyManagement::Unknown {
        return Err(anyhow!("{:?} is not a known AKM suite", known.trim()));
    }
    Ok((unknown, scheme))
}
