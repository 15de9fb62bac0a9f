use sdui_cache::DEFAULT_CAPACITY;
use serde::{Deserialize, Serialize};

/// Environment variable overriding [`ParserConfig::cache_capacity`]
pub const ENV_CACHE_CAPACITY: &str = "SDUI_CACHE_CAPACITY";

/// Environment variable disabling the descriptor cache when truthy
pub const ENV_CACHE_DISABLED: &str = "SDUI_CACHE_DISABLED";

/// Upper bound applied to capacities read from the environment
pub const MAX_ENV_CACHE_CAPACITY: usize = 4096;

/// Configuration for a [`crate::DescriptorParser`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Maximum number of parsed trees kept in the cache
    pub cache_capacity: usize,

    /// Look up and store parsed trees by content hash
    pub cache_enabled: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CAPACITY,
            cache_enabled: true,
        }
    }
}

impl ParserConfig {
    /// Cached parser holding at most `capacity` trees
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache_capacity: capacity,
            ..Default::default()
        }
    }

    /// Parser that never caches; callers own every tree
    pub fn uncached() -> Self {
        Self {
            cache_enabled: false,
            ..Default::default()
        }
    }

    /// Defaults overlaid with `SDUI_CACHE_CAPACITY` / `SDUI_CACHE_DISABLED`
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Self::from_env`] with an explicit variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(capacity) = lookup(ENV_CACHE_CAPACITY)
            .and_then(|v| v.trim().parse::<usize>().ok())
        {
            config.cache_capacity = capacity.clamp(1, MAX_ENV_CACHE_CAPACITY);
        }
        if lookup(ENV_CACHE_DISABLED).is_some_and(|v| truthy(&v)) {
            config.cache_enabled = false;
        }
        config
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.cache_enabled && self.cache_capacity == 0 {
            return Err("cache_capacity must be > 0 when the cache is enabled".to_string());
        }
        Ok(())
    }
}

fn truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
