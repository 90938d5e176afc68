//! Core types for project scaffolding

use crate::error::{Error, Result};
use crate::name::{split_scope, validate_package_name};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// A validated request to create a project
///
/// Can only be built through [`ProjectRequest::new`], so holding one means the
/// name passed package-name validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRequest {
    name: String,
    target_path: Utf8PathBuf,
}

impl ProjectRequest {
    /// Validate `name` and resolve its target directory under `base_dir`
    ///
    /// Scoped names (`@scope/pkg`) land in `base_dir/pkg`; the manifest keeps
    /// the full scoped name.
    ///
    /// # Errors
    /// Returns error if:
    /// - `name` fails package-name validation (errors or warnings)
    /// - `base_dir` is not absolute
    pub fn new(name: &str, base_dir: &Utf8Path) -> Result<Self> {
        let validation = validate_package_name(name);
        if !validation.valid_for_new_packages {
            return Err(Error::invalid_name(
                name,
                validation.errors,
                validation.warnings,
            ));
        }

        if !base_dir.is_absolute() {
            return Err(Error::invalid_path(base_dir.as_str()));
        }

        let dir_name = match split_scope(name) {
            Some((_, package)) => package,
            None => name,
        };

        Ok(Self {
            name: name.to_string(),
            target_path: base_dir.join(dir_name),
        })
    }

    /// Resolve the request against the process working directory
    pub fn in_current_dir(name: &str) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let cwd = Utf8PathBuf::try_from(cwd)
            .map_err(|e| Error::invalid_path(e.into_path_buf().display().to_string()))?;
        Self::new(name, &cwd)
    }

    /// Package name written to the manifest
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path of the project directory
    pub fn target_path(&self) -> &Utf8Path {
        &self.target_path
    }
}

/// Where the template is cloned from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TemplateSource {
    /// Repository URL
    pub url: String,
    /// Branch to check out instead of the remote HEAD
    #[serde(default)]
    pub branch: Option<String>,
    /// Clone depth
    #[serde(default = "default_depth")]
    pub depth: u32,
}

fn default_depth() -> u32 {
    1
}

/// Supported package managers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
    Bun,
}

impl PackageManager {
    /// Get all supported package managers
    pub fn all() -> Vec<Self> {
        vec![Self::Npm, Self::Yarn, Self::Pnpm, Self::Bun]
    }

    /// Executable name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Yarn => "yarn",
            Self::Pnpm => "pnpm",
            Self::Bun => "bun",
        }
    }

    /// Arguments of the dependency-install command
    pub fn install_args(&self) -> &'static [&'static str] {
        &["install"]
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageManager {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s_lower = s.trim().to_lowercase();
        Self::all()
            .into_iter()
            .find(|pm| pm.as_str() == s_lower)
            .ok_or_else(|| {
                let available = Self::all()
                    .iter()
                    .map(|pm| pm.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                Error::invalid_config(format!(
                    "Unknown package manager: {}. Available: {}",
                    s, available
                ))
            })
    }
}

/// Workflow steps, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    CreateDirectory,
    CloneTemplate,
    InstallDependencies,
    RemoveGitMetadata,
    RewriteManifest,
}

impl Step {
    /// Human-readable description shown while the step runs
    pub fn description(&self) -> &'static str {
        match self {
            Self::CreateDirectory => "Creating project directory",
            Self::CloneTemplate => "Cloning the template",
            Self::InstallDependencies => "Installing dependencies",
            Self::RemoveGitMetadata => "Removing git metadata",
            Self::RewriteManifest => "Updating the manifest",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Immutable context passed through every workflow step
#[derive(Debug, Clone)]
pub struct ScaffoldContext {
    pub request: ProjectRequest,
    pub template: TemplateSource,
    pub package_manager: PackageManager,
    /// Manifest file name relative to the project directory
    pub manifest_file: String,
    pub skip_install: bool,
}

impl ScaffoldContext {
    /// Absolute path of the project's manifest
    pub fn manifest_path(&self) -> Utf8PathBuf {
        self.request.target_path().join(&self.manifest_file)
    }
}

/// Result of a successful scaffold run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldOutcome {
    pub project_dir: Utf8PathBuf,
    pub manifest_path: Utf8PathBuf,
    pub package_manager: PackageManager,
    /// False when installation was skipped
    pub installed: bool,
}
