//! `sigplan.toml` parsing and discovery.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sigplan_cloud::auth::{ACCESS_KEY_ENV, SECRET_KEY_ENV};
use sigplan_cloud::CloudConfig;
use sigplan_verify::{ProfileLevel, Tolerances};

pub const CONFIG_FILE: &str = "sigplan.toml";

/// The top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SigplanConfig {
    /// Safety validation settings.
    #[serde(default)]
    pub validation: Option<ValidationConfig>,
    /// Remote optimizer settings.
    #[serde(default)]
    pub cloud: Option<CloudSection>,
}

/// `[validation]` section. Individual tolerances override the profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub bounds: Option<f64>,
    #[serde(default)]
    pub conflict_margin: Option<f64>,
    #[serde(default)]
    pub relations: Option<f64>,
    #[serde(default)]
    pub order: Option<f64>,
}

/// `[cloud]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloudSection {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub auth_url: Option<String>,
    /// Name of the environment variable holding the access key.
    #[serde(default)]
    pub access_key_env: Option<String>,
    /// Name of the environment variable holding the secret.
    #[serde(default)]
    pub secret_key_env: Option<String>,
}

impl SigplanConfig {
    /// Search upward from `start_dir` for a `sigplan.toml` file, parse and
    /// return it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let config: SigplanConfig = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((config, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing sigplan.toml")
    }

    /// Default validation profile name from the file.
    pub fn default_profile(&self) -> Option<&str> {
        self.validation.as_ref().and_then(|v| v.profile.as_deref())
    }

    /// Tolerances for `profile` (or the file's profile), with the file's
    /// individual overrides applied.
    pub fn tolerances(&self, profile: Option<&str>) -> Result<Tolerances> {
        let level = match profile.or_else(|| self.default_profile()) {
            Some(name) => name
                .parse::<ProfileLevel>()
                .map_err(anyhow::Error::msg)?,
            None => ProfileLevel::Default,
        };
        let mut tolerances = Tolerances::for_level(level);
        let Some(v) = &self.validation else {
            return Ok(tolerances);
        };
        let overrides = [
            (v.bounds, &mut tolerances.bounds),
            (v.conflict_margin, &mut tolerances.conflict_margin),
            (v.relations, &mut tolerances.relations),
            (v.order, &mut tolerances.order),
        ];
        let mut custom = false;
        for (value, slot) in overrides {
            if let Some(value) = value {
                anyhow::ensure!(
                    value.is_finite() && value >= 0.0,
                    "tolerance {value} in {CONFIG_FILE} should be a non-negative number"
                );
                *slot = value;
                custom = true;
            }
        }
        if custom {
            tolerances.level = ProfileLevel::Custom;
        }
        Ok(tolerances)
    }

    /// Remote endpoints; `smc_api_url` in the environment wins over the file.
    pub fn cloud_config(&self) -> CloudConfig {
        let mut config = CloudConfig::default();
        if let Some(c) = &self.cloud {
            if let Some(url) = &c.api_url {
                config.api_url = url.clone();
            }
            if let Some(url) = &c.auth_url {
                config.auth_url = url.clone();
            }
        }
        config.with_env_override()
    }

    /// Names of the environment variables holding the credentials.
    pub fn credential_vars(&self) -> (&str, &str) {
        let cloud = self.cloud.as_ref();
        (
            cloud
                .and_then(|c| c.access_key_env.as_deref())
                .unwrap_or(ACCESS_KEY_ENV),
            cloud
                .and_then(|c| c.secret_key_env.as_deref())
                .unwrap_or(SECRET_KEY_ENV),
        )
    }

    /// Generate the default template for `sigplan init`.
    pub fn template() -> String {
        format!(
            r#"[validation]
profile = "default"

[cloud]
access_key_env = "{ACCESS_KEY_ENV}"
secret_key_env = "{SECRET_KEY_ENV}"
"#
        )
    }
}
