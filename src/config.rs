//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/labeltree/labeltree.toml`
//! 3. Local config: `<project_dir>/.labeltree.toml`
//! 4. Environment variables: `LABELTREE_*` prefix

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{Domain, DomainResult, EncodingPolicy};

/// Name of the project-local config file.
pub const LOCAL_CONFIG_FILE: &str = ".labeltree.toml";

/// Unified configuration for labeltree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Domain used when none is given on the command line
    pub default_domain: String,
    /// Forest file used when none is given on the command line
    pub forest: Option<PathBuf>,
    /// Print tags as a JSON array instead of one per line
    pub json: bool,
    /// Custom domain names mapped to an encoding policy
    pub domains: BTreeMap<String, EncodingPolicy>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_domain: Domain::Location.to_string(),
            forest: None,
            json: false,
            domains: BTreeMap::new(),
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub default_domain: Option<String>,
    pub forest: Option<PathBuf>,
    pub json: Option<bool>,
    pub domains: Option<BTreeMap<String, EncodingPolicy>>,
}

/// Get the XDG config directory for labeltree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "labeltree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("labeltree.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(LOCAL_CONFIG_FILE)
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`; a relative result is anchored at `base`.
fn resolve_path(path: &Path, base: Option<&Path>) -> PathBuf {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf());
    match base {
        Some(base) if expanded.is_relative() => base.join(expanded),
        _ => expanded,
    }
}

impl Settings {
    /// Resolve a domain name to its encoding policy.
    ///
    /// Built-in domains take precedence over custom ones.
    pub fn policy_for(&self, domain: &str) -> DomainResult<EncodingPolicy> {
        match domain.parse::<Domain>() {
            Ok(builtin) => Ok(builtin.policy()),
            Err(unknown) => self
                .domains
                .get(domain.trim())
                .copied()
                .ok_or(unknown),
        }
    }

    /// Merge overlay config onto self (base).
    ///
    /// - Scalars: overlay wins if Some, otherwise keep base
    /// - Domains: key-wise union, overlay entries win
    fn merge_with(&self, overlay: &RawSettings, base_dir: Option<&Path>) -> Self {
        let mut domains = self.domains.clone();
        if let Some(extra) = &overlay.domains {
            domains.extend(extra.iter().map(|(name, policy)| (name.clone(), *policy)));
        }
        Self {
            default_domain: overlay
                .default_domain
                .clone()
                .unwrap_or_else(|| self.default_domain.clone()),
            forest: overlay
                .forest
                .as_deref()
                .map(|forest| resolve_path(forest, base_dir))
                .or_else(|| self.forest.clone()),
            json: overlay.json.unwrap_or(self.json),
            domains,
        }
    }

    /// Apply global config onto defaults.
    ///
    /// Unlike `merge_with()`, a domain table in the global file REPLACES the
    /// compiled one: the global file defines the baseline.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            default_domain: global
                .default_domain
                .clone()
                .unwrap_or_else(|| self.default_domain.clone()),
            forest: global
                .forest
                .as_deref()
                .map(|forest| resolve_path(forest, None))
                .or_else(|| self.forest.clone()),
            json: global.json.unwrap_or(self.json),
            domains: global.domains.clone().unwrap_or_else(|| self.domains.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory holding `.labeltree.toml`
    ///
    /// A relative `forest` in the local file is resolved against `project_dir`.
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config: {}", global_path.display());
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        if let Some(project) = project_dir {
            let local_path = local_config_path(project);
            if local_path.exists() {
                debug!("loading local config: {}", local_path.display());
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw, Some(project));
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;

        Ok(current)
    }

    /// Apply LABELTREE_* environment variables as explicit overrides.
    ///
    /// `LABELTREE_DOMAINS__<NAME>=<policy>` adds or replaces a custom domain.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("LABELTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("default_domain") {
            settings.default_domain = val;
        }
        if let Ok(val) = config.get_string("forest") {
            settings.forest = Some(resolve_path(Path::new(&val), None));
        }
        if let Ok(val) = config.get_bool("json") {
            settings.json = val;
        }
        if let Ok(table) = config.get_table("domains") {
            for (name, value) in table {
                let policy = value
                    .into_string()
                    .map_err(config_err)?
                    .parse::<EncodingPolicy>()
                    .map_err(|e| ApplicationError::Config {
                        message: format!("LABELTREE_DOMAINS__{}: {}", name.to_uppercase(), e),
                    })?;
                settings.domains.insert(name, policy);
            }
        }

        Ok(settings)
    }

    /// Reject a default domain that resolves to no policy.
    fn validate(&self) -> Result<(), ApplicationError> {
        self.policy_for(&self.default_domain)
            .map(|_| ())
            .map_err(|e| ApplicationError::Config {
                message: format!("default_domain: {e}"),
            })
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# labeltree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/labeltree/labeltree.toml  (defines your baseline)
#   Local:  <project_dir>/.labeltree.toml       (project-specific additions)
#   Env:    LABELTREE_* environment variables   (explicit overrides)

# Domain used when --domain is not given: location, education or a custom name
# default_domain = "location"

# Forest file used when none is given (relative paths resolve against the project dir)
# forest = "forests/regions.json"

# Print tags as a JSON array
# json = false

# Custom domains and their encoding policy ("compress" or "expand").
# Local entries are added to the global table, overriding same-named ones.
[domains]
# museum = "compress"
# curriculum = "expand"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
