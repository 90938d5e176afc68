//! Dependency installation through a package manager

use crate::error::{Error, Result};
use crate::process::resolve_program;
use crate::types::{PackageManager, Step};
use async_trait::async_trait;
use camino::Utf8Path;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::OnceLock;
use tokio::process::Command;
use tracing::{debug, info};

/// Installs a project's dependencies
#[async_trait]
pub trait PackageInstaller: Send + Sync {
    /// Fail early when the package manager cannot run at all
    fn ensure_available(&self) -> Result<()>;

    /// Install dependencies with `project_dir` as working directory
    async fn install(&self, project_dir: &Utf8Path) -> Result<()>;
}

/// Runs `<manager> install` as a subprocess
#[derive(Debug, Clone)]
pub struct CommandInstaller {
    manager: PackageManager,
    program: String,
    resolved: OnceLock<PathBuf>,
}

impl CommandInstaller {
    pub fn new(manager: PackageManager) -> Self {
        Self::with_program(manager, manager.as_str())
    }

    /// Run `manager`'s install command through a specific executable
    pub fn with_program(manager: PackageManager, program: impl Into<String>) -> Self {
        Self {
            manager,
            program: program.into(),
            resolved: OnceLock::new(),
        }
    }

    fn command_line(&self) -> String {
        let mut parts = vec![self.program.as_str()];
        parts.extend_from_slice(self.manager.install_args());
        parts.join(" ")
    }

    /// Path of the executable, looked up on first use
    fn program_path(&self) -> Result<&Path> {
        if let Some(path) = self.resolved.get() {
            return Ok(path.as_path());
        }
        let path = resolve_program(&self.program)?;
        Ok(self.resolved.get_or_init(|| path).as_path())
    }
}

#[async_trait]
impl PackageInstaller for CommandInstaller {
    fn ensure_available(&self) -> Result<()> {
        self.program_path().map(|_| ())
    }

    async fn install(&self, project_dir: &Utf8Path) -> Result<()> {
        info!("Installing dependencies in {} with {}", project_dir, self.manager);
        let program = self.program_path()?;
        debug!("Running: {} (from {})", self.command_line(), program.display());

        let output = Command::new(program)
            .args(self.manager.install_args())
            .current_dir(project_dir)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                Error::subprocess_failure(Step::InstallDependencies, self.command_line(), e.to_string())
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::subprocess_failure(
                Step::InstallDependencies,
                self.command_line(),
                format!("exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        info!("Dependencies installed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_command_line() {
        assert_eq!(
            CommandInstaller::new(PackageManager::Npm).command_line(),
            "npm install"
        );
        assert_eq!(
            CommandInstaller::new(PackageManager::Pnpm).command_line(),
            "pnpm install"
        );
    }

    #[test]
    fn test_missing_package_manager_is_command_not_found() {
        let installer =
            CommandInstaller::with_program(PackageManager::Bun, "definitely-not-bun-91c3");
        let err = installer.ensure_available().unwrap_err();
        assert!(
            matches!(err, Error::CommandNotFound { ref command } if command == "definitely-not-bun-91c3")
        );
    }

    #[tokio::test]
    async fn test_install_without_program_creates_nothing() {
        let temp = TempDir::new().unwrap();
        let dir = Utf8Path::from_path(temp.path()).unwrap();
        let installer =
            CommandInstaller::with_program(PackageManager::Npm, "definitely-not-npm-91c3");

        let err = installer.install(dir).await.unwrap_err();
        assert!(matches!(err, Error::CommandNotFound { .. }));
        assert_eq!(std::fs::read_dir(dir).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_install_runs_in_project_dir() {
        use std::os::unix::fs::PermissionsExt;

        let bin = TempDir::new().unwrap();
        let script = bin.path().join("stub-pm");
        std::fs::write(&script, "#!/bin/sh\nprintf '%s\\n' \"$*\" > ran-with\npwd >> ran-with\n")
            .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let project = TempDir::new().unwrap();
        let dir = Utf8Path::from_path(project.path()).unwrap();
        let installer = CommandInstaller::with_program(PackageManager::Npm, script.to_str().unwrap());
        installer.ensure_available().unwrap();
        installer.install(dir).await.unwrap();

        let ran_with = std::fs::read_to_string(project.path().join("ran-with")).unwrap();
        let lines: Vec<&str> = ran_with.lines().collect();
        assert_eq!(lines[0], "install");
        assert_eq!(
            std::fs::canonicalize(lines[1]).unwrap(),
            std::fs::canonicalize(project.path()).unwrap()
        );
    }
}
