//! Lightweight configuration loader, typed settings and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (nested keys separated by `__`, e.g. `APP_CACHE__TTL_SECONDS`).

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.settings()?;
        Ok(config)
    }

    pub fn from_figment(figment: Figment) -> Self {
        Self { figment }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Extract and validate the typed settings tree.
    pub fn settings(&self) -> anyhow::Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to extract settings: {}", e))?;
        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub cache: CacheSettings,
    pub fusion: FusionSettings,
    pub data: DataSettings,
    pub embed: EmbedSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheSettings {
    /// Minimum cosine similarity for a cached query to answer a new one.
    pub similarity_threshold: f32,
    pub ttl_seconds: u64,
    /// Upper bound on the number of queries tracked by the cache index.
    pub max_entries: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { similarity_threshold: 0.90, ttl_seconds: 600, max_entries: 1000 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FusionSettings {
    pub limit: usize,
    pub weight_vector: f32,
    pub weight_lexical: f32,
    /// Each backend is asked for `limit * candidate_multiplier` hits.
    pub candidate_multiplier: usize,
}

impl Default for FusionSettings {
    fn default() -> Self {
        Self { limit: 5, weight_vector: 0.5, weight_lexical: 0.5, candidate_multiplier: 2 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataSettings {
    pub raw_txt_dir: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self { raw_txt_dir: "./data/txt".to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmbedSettings {
    pub dim: usize,
}

impl Default for EmbedSettings {
    fn default() -> Self {
        Self { dim: 384 }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        let threshold = self.cache.similarity_threshold;
        if !threshold.is_finite() || !(-1.0..=1.0).contains(&threshold) {
            return Err(Error::InvalidConfig(format!(
                "cache.similarity_threshold must lie in [-1, 1], got {threshold}"
            )));
        }
        if self.cache.ttl_seconds == 0 {
            return Err(Error::InvalidConfig("cache.ttl_seconds must be positive".to_string()));
        }
        if self.cache.max_entries == 0 {
            return Err(Error::InvalidConfig("cache.max_entries must be positive".to_string()));
        }
        if self.fusion.candidate_multiplier == 0 {
            return Err(Error::InvalidConfig(
                "fusion.candidate_multiplier must be positive".to_string(),
            ));
        }
        validate_weights(self.fusion.weight_vector, self.fusion.weight_lexical)?;
        if self.embed.dim == 0 {
            return Err(Error::InvalidConfig("embed.dim must be positive".to_string()));
        }
        Ok(())
    }
}

/// Fusion weights must be finite and non-negative; they need not sum to 1.
pub fn validate_weights(weight_vector: f32, weight_lexical: f32) -> Result<()> {
    for (name, w) in [("weight_vector", weight_vector), ("weight_lexical", weight_lexical)] {
        if !w.is_finite() || w < 0.0 {
            return Err(Error::InvalidConfig(format!("{name} must be finite and >= 0, got {w}")));
        }
    }
    Ok(())
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
