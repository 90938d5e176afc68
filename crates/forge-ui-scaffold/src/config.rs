//! Scaffolder configuration with layered precedence
//!
//! Sources, lowest to highest:
//! 1. Embedded defaults (`config/defaults.yaml`)
//! 2. User config file (`--config` path, or `~/.forge-ui/config.yaml`)
//! 3. Environment variables (`FORGE_UI_*` prefix)
//! 4. CLI flags (applied by the caller)

use crate::error::{Error, Result};
use crate::types::{PackageManager, ProjectRequest, ScaffoldContext, TemplateSource};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::env;
use std::fs;
use tracing::debug;

const EMBEDDED_DEFAULTS: &str = include_str!("../config/defaults.yaml");

const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolved scaffolder configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScaffoldConfig {
    pub template: TemplateSource,
    pub package_manager: PackageManager,
    pub manifest_file: String,
}

impl ScaffoldConfig {
    /// Configuration built into the binary
    pub fn embedded() -> Result<Self> {
        serde_yaml_ng::from_str(EMBEDDED_DEFAULTS).map_err(|e| {
            Error::invalid_config(format!("Failed to parse embedded defaults: {}", e))
        })
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.template.url.trim().is_empty() {
            return Err(Error::invalid_config("template url must not be empty"));
        }

        if self.template.depth == 0 {
            return Err(Error::invalid_config("template depth must be at least 1"));
        }

        let mut components = Utf8Path::new(&self.manifest_file).components();
        let plain_name = matches!(
            (components.next(), components.next()),
            (Some(Utf8Component::Normal(_)), None)
        );
        if !plain_name {
            return Err(Error::invalid_config(format!(
                "manifest-file must be a plain file name, got '{}'",
                self.manifest_file
            )));
        }

        Ok(())
    }

    /// Bind this configuration to a validated request
    pub fn into_context(self, request: ProjectRequest, skip_install: bool) -> ScaffoldContext {
        ScaffoldContext {
            request,
            template: self.template,
            package_manager: self.package_manager,
            manifest_file: self.manifest_file,
            skip_install,
        }
    }

    fn merge(mut self, overlay: ConfigOverlay) -> Self {
        if let Some(template) = overlay.template {
            if let Some(url) = template.url {
                self.template.url = url;
            }
            if let Some(branch) = template.branch {
                self.template.branch = Some(branch);
            }
            if let Some(depth) = template.depth {
                self.template.depth = depth;
            }
        }

        if let Some(package_manager) = overlay.package_manager {
            self.package_manager = package_manager;
        }

        if let Some(manifest_file) = overlay.manifest_file {
            self.manifest_file = manifest_file;
        }

        self
    }
}

/// Partial configuration as found in a user file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ConfigOverlay {
    template: Option<TemplateOverlay>,
    package_manager: Option<PackageManager>,
    manifest_file: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct TemplateOverlay {
    url: Option<String>,
    branch: Option<String>,
    depth: Option<u32>,
}

/// Configuration hierarchy loader
pub struct ConfigLoader {
    /// Explicit config file; must exist when set
    config_file: Option<Utf8PathBuf>,
    /// Directory searched for `config.yaml` when no explicit file is given
    config_dir: Option<Utf8PathBuf>,
}

impl ConfigLoader {
    /// Create a loader using `explicit` or the standard config directory
    pub fn new(explicit: Option<&Utf8Path>) -> Self {
        Self {
            config_file: explicit.map(Utf8Path::to_path_buf),
            config_dir: default_config_dir(),
        }
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: Utf8PathBuf) -> Self {
        Self {
            config_file: None,
            config_dir: Some(config_dir),
        }
    }

    /// Load configuration with layered precedence
    pub fn load(&self) -> Result<ScaffoldConfig> {
        let mut config = ScaffoldConfig::embedded()?;

        if let Some(path) = self.config_path()? {
            debug!("Loading config file: {}", path);
            let overlay = load_overlay(&path)?;
            config = config.merge(overlay);
        }

        config = apply_env_overrides(config)?;
        config.validate()?;
        Ok(config)
    }

    fn config_path(&self) -> Result<Option<Utf8PathBuf>> {
        if let Some(path) = &self.config_file {
            if !path.exists() {
                return Err(Error::config_not_found(path.as_str()));
            }
            return Ok(Some(path.clone()));
        }

        Ok(self
            .config_dir
            .as_ref()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .filter(|path| path.exists()))
    }
}

/// `~/.forge-ui`, preferring `$HOME` over the platform lookup
fn default_config_dir() -> Option<Utf8PathBuf> {
    let home = env::var("HOME")
        .ok()
        .map(std::path::PathBuf::from)
        .or_else(dirs::home_dir)?;
    let home = Utf8PathBuf::from_path_buf(home).ok()?;
    Some(home.join(".forge-ui"))
}

fn load_overlay(path: &Utf8Path) -> Result<ConfigOverlay> {
    let content = fs::read_to_string(path).map_err(|e| Error::filesystem(path.as_str(), e))?;
    if content.trim().is_empty() {
        return Ok(ConfigOverlay::default());
    }
    serde_yaml_ng::from_str(&content)
        .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))
}

/// Apply `FORGE_UI_*` environment variable overrides
fn apply_env_overrides(mut config: ScaffoldConfig) -> Result<ScaffoldConfig> {
    if let Ok(val) = env::var("FORGE_UI_TEMPLATE_URL") {
        config.template.url = val;
    }

    if let Ok(val) = env::var("FORGE_UI_TEMPLATE_BRANCH") {
        config.template.branch = if val.is_empty() { None } else { Some(val) };
    }

    if let Ok(val) = env::var("FORGE_UI_CLONE_DEPTH") {
        config.template.depth = val
            .parse()
            .map_err(|_| Error::invalid_config("FORGE_UI_CLONE_DEPTH must be a valid number"))?;
    }

    if let Ok(val) = env::var("FORGE_UI_PACKAGE_MANAGER") {
        config.package_manager = val.parse()?;
    }

    Ok(config)
}
