use lazyload_types::PageEvent;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

pub const CONFIG_VERSION: u64 = 1;
const APP_DIR: &str = "lazyload";
const CONFIG_FILE: &str = "config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// What happens when a caller-supplied success or error callback panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CallbackPolicy {
    /// Catch the panic, log it and keep processing the remaining jobs.
    #[default]
    Isolate,
    /// Let the panic unwind through the scheduler call that ran the callback.
    Propagate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LazyLoadConfig {
    /// Format version of the file. Files written by a newer release are
    /// rejected.
    pub version: u64,
    /// Element attribute holding the default image source.
    pub src_attribute: String,
    /// Page events that trigger a sweep while jobs are pending.
    pub events: Vec<PageEvent>,
    pub callback_policy: CallbackPolicy,
    /// Number of resident images the fetcher keeps for synchronous loads.
    pub cache_capacity: usize,
}

impl Default for LazyLoadConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            src_attribute: "src".to_string(),
            events: PageEvent::ALL.to_vec(),
            callback_policy: CallbackPolicy::default(),
            cache_capacity: 200,
        }
    }
}

impl LazyLoadConfig {
    pub fn with_src_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.src_attribute = attribute.into();
        self
    }

    pub fn with_events(mut self, events: Vec<PageEvent>) -> Self {
        self.events = events;
        self
    }

    pub fn with_callback_policy(mut self, policy: CallbackPolicy) -> Self {
        self.callback_policy = policy;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn listens_to(&self, event: PageEvent) -> bool {
        self.events.contains(&event)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(ConfigError::Invalid(format!(
                "Unsupported config version {} (expected 1 to {})",
                self.version, CONFIG_VERSION
            )));
        }

        if self.src_attribute.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "Source attribute cannot be empty".to_string(),
            ));
        }

        if self.events.is_empty() {
            return Err(ConfigError::Invalid(
                "At least one page event is required".to_string(),
            ));
        }

        if self.cache_capacity == 0 {
            return Err(ConfigError::Invalid(
                "Cache capacity must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Loads `path`, falling back to defaults when the file does not exist.
    /// Parse and validation errors are still reported.
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        match Self::load(path) {
            Err(ConfigError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                warn!("No config at {:?}, using defaults", path);
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = LazyLoadConfig::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.src_attribute, "src");
        assert_eq!(config.events, vec![PageEvent::Scroll, PageEvent::Resize]);
        assert_eq!(config.callback_policy, CallbackPolicy::Isolate);
        assert_eq!(config.cache_capacity, 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = LazyLoadConfig::default()
            .with_src_attribute("data-src")
            .with_events(vec![PageEvent::Scroll])
            .with_callback_policy(CallbackPolicy::Propagate)
            .with_cache_capacity(16);

        assert_eq!(config.src_attribute, "data-src");
        assert!(config.listens_to(PageEvent::Scroll));
        assert!(!config.listens_to(PageEvent::Resize));
        assert_eq!(config.callback_policy, CallbackPolicy::Propagate);
        assert_eq!(config.cache_capacity, 16);
    }

    #[test]
    fn test_validation() {
        let invalid = LazyLoadConfig::default().with_src_attribute("  ");
        assert!(matches!(invalid.validate(), Err(ConfigError::Invalid(_))));

        let invalid = LazyLoadConfig::default().with_events(Vec::new());
        assert!(matches!(invalid.validate(), Err(ConfigError::Invalid(_))));

        let invalid = LazyLoadConfig::default().with_cache_capacity(0);
        assert!(matches!(invalid.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_newer_version_is_rejected_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");

        std::fs::write(&path, format!(r#"{{ "version": {} }}"#, CONFIG_VERSION + 1)).unwrap();
        assert!(matches!(
            LazyLoadConfig::load(&path),
            Err(ConfigError::Invalid(_))
        ));

        std::fs::write(&path, r#"{ "version": 0 }"#).unwrap();
        assert!(matches!(
            LazyLoadConfig::load(&path),
            Err(ConfigError::Invalid(_))
        ));

        std::fs::write(&path, format!(r#"{{ "version": {} }}"#, CONFIG_VERSION)).unwrap();
        assert_eq!(LazyLoadConfig::load(&path).unwrap(), LazyLoadConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        let config = LazyLoadConfig::default()
            .with_src_attribute("data-original")
            .with_callback_policy(CallbackPolicy::Propagate);
        config.save(&path).unwrap();

        let loaded = LazyLoadConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{ "events": ["scroll"], "callback_policy": "propagate" }"#)
            .unwrap();

        let loaded = LazyLoadConfig::load(&path).unwrap();
        assert_eq!(loaded.events, vec![PageEvent::Scroll]);
        assert_eq!(loaded.callback_policy, CallbackPolicy::Propagate);
        assert_eq!(loaded.src_attribute, "src");
        assert_eq!(loaded.cache_capacity, 200);
    }

    #[test]
    fn test_load_or_default() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.json");
        assert_eq!(
            LazyLoadConfig::load_or_default(&missing).unwrap(),
            LazyLoadConfig::default()
        );

        let broken = temp_dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(
            LazyLoadConfig::load_or_default(&broken),
            Err(ConfigError::Parse { .. })
        ));

        let invalid = temp_dir.path().join("invalid.json");
        std::fs::write(&invalid, r#"{ "cache_capacity": 0 }"#).unwrap();
        assert!(matches!(
            LazyLoadConfig::load_or_default(&invalid),
            Err(ConfigError::Invalid(_))
        ));
    }
}
