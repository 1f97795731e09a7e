// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type support configuration.
//!
//! - **Level 1 (Static)**: compile-time constants (bounds, header sizes, pool sizes)
//! - **Level 2 (Dynamic)**: [`PluginConfig`] loaded from defaults, the
//!   environment or (feature `config-file`) a YAML file, published through
//!   [`RuntimeConfig`]
//!
//! ```ignore
//! use patient_monitoring::config::{PluginConfig, RuntimeConfig};
//!
//! let runtime = RuntimeConfig::global();
//! runtime.store(PluginConfig::from_env()?);
//! let active = runtime.load(); // Arc<PluginConfig>, lock-free
//! ```
//!
//! # Environment
//!
//! | Variable | Values |
//! |---|---|
//! | `PM_DATA_REPRESENTATION` | `xcdr`, `xcdr2` |
//! | `PM_ENDIANNESS` | `le`, `be`, `native` |
//! | `PM_SAMPLE_POOL_SIZE` | integer > 0 |
//! | `PM_BUFFER_POOL_SIZE` | integer > 0 |

use crate::core::ser::Endianness;
use crate::dds::{Error, Result};
use crate::protocol::DataRepresentation;
use arc_swap::ArcSwap;
use std::sync::{Arc, OnceLock};

// =======================================================================
// Static constants
// =======================================================================

/// IDL bound of `PatientMonitoring::patient_condition`.
pub const PATIENT_CONDITION_MAX_LENGTH: usize = 128;

/// Registered type name.
pub const TYPE_NAME: &str = "PatientMonitoring";

/// Samples kept per endpoint pool by default.
pub const DEFAULT_SAMPLE_POOL_SIZE: usize = 16;

/// Serialization buffers kept per endpoint pool by default.
pub const DEFAULT_BUFFER_POOL_SIZE: usize = 16;

/// Upper limit accepted for either pool.
pub const MAX_POOL_SIZE: usize = 65_536;

/// Length of a DDS key hash.
pub const KEY_HASH_LENGTH: usize = 16;

pub const ENV_DATA_REPRESENTATION: &str = "PM_DATA_REPRESENTATION";
pub const ENV_ENDIANNESS: &str = "PM_ENDIANNESS";
pub const ENV_SAMPLE_POOL_SIZE: &str = "PM_SAMPLE_POOL_SIZE";
pub const ENV_BUFFER_POOL_SIZE: &str = "PM_BUFFER_POOL_SIZE";

// =======================================================================
// Plugin configuration
// =======================================================================

/// Settings a type plugin reads when it is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginConfig {
    /// Representation used when a writer does not pick one.
    pub default_representation: DataRepresentation,
    /// Byte order of serialized payloads.
    pub endianness: Endianness,
    pub sample_pool_size: usize,
    pub buffer_pool_size: usize,
    /// Pad payloads to a multiple of four and record it in the options.
    pub pad_to_four: bool,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            default_representation: DataRepresentation::Xcdr,
            endianness: Endianness::Little,
            sample_pool_size: DEFAULT_SAMPLE_POOL_SIZE,
            buffer_pool_size: DEFAULT_BUFFER_POOL_SIZE,
            pad_to_four: true,
        }
    }
}

impl PluginConfig {
    /// Defaults overridden by `PM_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(ENV_DATA_REPRESENTATION) {
            config.default_representation = parse_representation(&value)?;
        }
        if let Some(value) = lookup(ENV_ENDIANNESS) {
            config.endianness = value
                .parse()
                .map_err(|e: String| Error::Config(format!("{}: {}", ENV_ENDIANNESS, e)))?;
        }
        if let Some(value) = lookup(ENV_SAMPLE_POOL_SIZE) {
            config.sample_pool_size = parse_pool_size(ENV_SAMPLE_POOL_SIZE, &value)?;
        }
        if let Some(value) = lookup(ENV_BUFFER_POOL_SIZE) {
            config.buffer_pool_size = parse_pool_size(ENV_BUFFER_POOL_SIZE, &value)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_representation == DataRepresentation::Xml {
            return Err(Error::Config(
                "XML data representation is not supported".into(),
            ));
        }
        for (name, size) in [
            ("sample_pool_size", self.sample_pool_size),
            ("buffer_pool_size", self.buffer_pool_size),
        ] {
            if size == 0 || size > MAX_POOL_SIZE {
                return Err(Error::Config(format!(
                    "{} must be in 1..={}, got {}",
                    name, MAX_POOL_SIZE, size
                )));
            }
        }
        Ok(())
    }
}

fn parse_representation(value: &str) -> Result<DataRepresentation> {
    value
        .parse()
        .map_err(|e: String| Error::Config(format!("{}: {}", ENV_DATA_REPRESENTATION, e)))
}

fn parse_pool_size(name: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|e| Error::Config(format!("{}: invalid pool size '{}': {}", name, value, e)))
}

#[cfg(feature = "config-file")]
mod file {
    use super::*;
    use serde::Deserialize;
    use std::path::Path;

    /// YAML layout; every key is optional.
    ///
    /// ```yaml
    /// data_representation: xcdr2
    /// endianness: be
    /// sample_pool_size: 32
    /// buffer_pool_size: 8
    /// pad_to_four: true
    /// ```
    #[derive(Debug, Deserialize, Default)]
    #[serde(default, deny_unknown_fields)]
    struct YamlPluginConfig {
        data_representation: Option<String>,
        endianness: Option<String>,
        sample_pool_size: Option<usize>,
        buffer_pool_size: Option<usize>,
        pad_to_four: Option<bool>,
    }

    impl PluginConfig {
        /// Parse a YAML document on top of the defaults.
        pub fn from_yaml_str(yaml_content: &str) -> Result<Self> {
            let doc: YamlPluginConfig = serde_yaml::from_str(yaml_content)
                .map_err(|e| Error::Config(format!("Failed to parse YAML: {}", e)))?;

            let mut config = Self::default();
            if let Some(value) = doc.data_representation {
                config.default_representation = parse_representation(&value)?;
            }
            if let Some(value) = doc.endianness {
                config.endianness = value
                    .parse()
                    .map_err(|e: String| Error::Config(format!("endianness: {}", e)))?;
            }
            if let Some(size) = doc.sample_pool_size {
                config.sample_pool_size = size;
            }
            if let Some(size) = doc.buffer_pool_size {
                config.buffer_pool_size = size;
            }
            if let Some(pad) = doc.pad_to_four {
                config.pad_to_four = pad;
            }
            config.validate()?;
            Ok(config)
        }

        /// Load a YAML file.
        pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read {}: {}", path.display(), e))
            })?;
            log::debug!("[config] loading plugin config from {}", path.display());
            Self::from_yaml_str(&content)
        }
    }
}

// =======================================================================
// Runtime Configuration (lock-free)
// =======================================================================

/// Shared, atomically swappable plugin configuration.
///
/// Plugins snapshot the active config when created; later stores only
/// affect plugins created afterwards.
#[derive(Clone)]
pub struct RuntimeConfig {
    active: Arc<ArcSwap<PluginConfig>>,
}

impl RuntimeConfig {
    #[must_use]
    pub fn new(config: PluginConfig) -> Self {
        Self {
            active: Arc::new(ArcSwap::from_pointee(config)),
        }
    }

    /// Process-wide instance, initialized from defaults.
    pub fn global() -> &'static RuntimeConfig {
        static GLOBAL: OnceLock<RuntimeConfig> = OnceLock::new();
        GLOBAL.get_or_init(|| RuntimeConfig::new(PluginConfig::default()))
    }

    #[inline]
    #[must_use]
    pub fn load(&self) -> Arc<PluginConfig> {
        self.active.load_full()
    }

    /// Replace the active configuration.
    #[inline]
    pub fn store(&self, config: PluginConfig) {
        self.active.store(Arc::new(config));
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new(PluginConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PluginConfig::default();
        assert_eq!(config.default_representation, DataRepresentation::Xcdr);
        assert_eq!(config.endianness, Endianness::Little);
        assert!(config.pad_to_four);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let config = PluginConfig::from_lookup(lookup(&[
            (ENV_DATA_REPRESENTATION, "XCDR2"),
            (ENV_ENDIANNESS, "be"),
            (ENV_SAMPLE_POOL_SIZE, "4"),
        ]))
        .expect("valid env");
        assert_eq!(config.default_representation, DataRepresentation::Xcdr2);
        assert_eq!(config.endianness, Endianness::Big);
        assert_eq!(config.sample_pool_size, 4);
        assert_eq!(config.buffer_pool_size, DEFAULT_BUFFER_POOL_SIZE);
    }

    #[test]
    fn test_env_rejects_bad_values() {
        for pairs in [
            [(ENV_DATA_REPRESENTATION, "xml")],
            [(ENV_DATA_REPRESENTATION, "json")],
            [(ENV_ENDIANNESS, "middle")],
            [(ENV_SAMPLE_POOL_SIZE, "0")],
            [(ENV_BUFFER_POOL_SIZE, "many")],
        ] {
            let err = PluginConfig::from_lookup(lookup(&pairs)).expect_err("invalid env");
            assert!(matches!(err, Error::Config(_)), "{:?}", err);
        }
    }

    #[test]
    fn test_runtime_config_swap() {
        let runtime = RuntimeConfig::default();
        let before = runtime.load();
        runtime.store(PluginConfig {
            endianness: Endianness::Big,
            ..PluginConfig::default()
        });
        assert_eq!(before.endianness, Endianness::Little);
        assert_eq!(runtime.load().endianness, Endianness::Big);

        let shared = runtime.clone();
        shared.store(PluginConfig::default());
        assert_eq!(runtime.load().endianness, Endianness::Little);
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn test_yaml_config() {
        let yaml = "data_representation: xcdr2\n\
                    endianness: big\n\
                    buffer_pool_size: 3\n\
                    pad_to_four: false\n";
        let config = PluginConfig::from_yaml_str(yaml).expect("valid yaml");
        assert_eq!(config.default_representation, DataRepresentation::Xcdr2);
        assert_eq!(config.endianness, Endianness::Big);
        assert_eq!(config.buffer_pool_size, 3);
        assert!(!config.pad_to_four);

        assert!(PluginConfig::from_yaml_str("unknown_key: 1\n").is_err());
        assert!(PluginConfig::from_yaml_str("sample_pool_size: 0\n").is_err());
    }
}
