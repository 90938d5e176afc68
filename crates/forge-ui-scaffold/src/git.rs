//! Source-control operations: shallow cloning and metadata removal

use crate::error::{Error, Result};
use crate::process::resolve_program;
use crate::types::Step;
use async_trait::async_trait;
use camino::Utf8Path;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::OnceLock;
use tokio::process::Command;
use tracing::{debug, info};

/// Options for cloning a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneOptions {
    /// History depth to fetch
    pub depth: u32,
    /// Branch to checkout after clone
    pub branch: Option<String>,
}

impl Default for CloneOptions {
    fn default() -> Self {
        Self {
            depth: 1,
            branch: None,
        }
    }
}

/// A source-control client able to clone a template
#[async_trait]
pub trait SourceControl: Send + Sync {
    /// Fail early when the client cannot run at all
    fn ensure_available(&self) -> Result<()>;

    /// Clone `url` into `destination`, which must be absent or empty
    async fn shallow_clone(
        &self,
        url: &str,
        destination: &Utf8Path,
        options: &CloneOptions,
    ) -> Result<()>;
}

/// `git` executable on PATH
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
    resolved: OnceLock<PathBuf>,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::with_program("git")
    }
}

impl GitCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific git executable
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            resolved: OnceLock::new(),
        }
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
impl SourceControl for GitCli {
    fn ensure_available(&self) -> Result<()> {
        self.program_path().map(|_| ())
    }

    async fn shallow_clone(
        &self,
        url: &str,
        destination: &Utf8Path,
        options: &CloneOptions,
    ) -> Result<()> {
        info!("Cloning repository: {} -> {}", url, destination);

        if !is_valid_repo_url(url) {
            return Err(Error::invalid_repo_url(url));
        }

        if !is_empty_or_absent(destination).await? {
            return Err(Error::directory_exists(destination.as_str()));
        }

        let program = self.program_path()?;
        let args = clone_args(url, destination, options);
        debug!("Running: {} {}", program.display(), args.join(" "));

        let output = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                Error::subprocess_failure(
                    Step::CloneTemplate,
                    format!("{} clone", self.program),
                    e.to_string(),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::subprocess_failure(
                Step::CloneTemplate,
                format!("{} clone", self.program),
                format!("exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        info!("Repository cloned successfully");
        Ok(())
    }
}

/// Delete the `.git` entry under `project_dir`
///
/// A `.git` file (a gitlink left by worktrees and submodules) is removed as
/// well. Returns whether anything was removed; a missing entry is not an
/// error.
pub async fn remove_git_metadata(project_dir: &Utf8Path) -> Result<bool> {
    let git_dir = project_dir.join(".git");
    let metadata = match tokio::fs::symlink_metadata(&git_dir).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No git metadata at {}", git_dir);
            return Ok(false);
        }
        Err(e) => return Err(Error::filesystem(git_dir.as_str(), e)),
    };

    let removed = if metadata.is_dir() {
        tokio::fs::remove_dir_all(&git_dir).await
    } else {
        tokio::fs::remove_file(&git_dir).await
    };
    removed.map_err(|e| Error::filesystem(git_dir.as_str(), e))?;

    debug!("Removed {}", git_dir);
    Ok(true)
}

/// Arguments for `git clone`
fn clone_args(url: &str, destination: &Utf8Path, options: &CloneOptions) -> Vec<String> {
    let mut args = vec![
        "clone".to_string(),
        "--depth".to_string(),
        options.depth.to_string(),
    ];

    if let Some(branch) = &options.branch {
        args.push("--branch".to_string());
        args.push(branch.clone());
    }

    args.push(url.to_string());
    args.push(destination.to_string());
    args
}

/// Validate if a string is a valid repository URL
fn is_valid_repo_url(url: &str) -> bool {
    ["https://", "http://", "git@", "ssh://", "file://"]
        .iter()
        .any(|prefix| url.starts_with(prefix))
}

async fn is_empty_or_absent(path: &Utf8Path) -> Result<bool> {
    match tokio::fs::read_dir(path).await {
        Ok(mut entries) => Ok(entries.next_entry().await?.is_none()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(true),
        Err(e) => Err(Error::filesystem(path.as_str(), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn temp_path(temp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap()
    }

    #[test]
    fn test_is_valid_repo_url() {
        assert!(is_valid_repo_url("https://github.com/01jam/ui.git"));
        assert!(is_valid_repo_url("git@github.com:01jam/ui.git"));
        assert!(is_valid_repo_url("http://example.com/repo.git"));
        assert!(is_valid_repo_url("ssh://git@example.com/repo.git"));
        assert!(is_valid_repo_url("file:///srv/templates/ui"));
        assert!(!is_valid_repo_url("invalid-url"));
        assert!(!is_valid_repo_url(""));
    }

    #[test]
    fn test_clone_args_shallow() {
        let args = clone_args(
            "https://github.com/01jam/ui.git",
            Utf8Path::new("/work/my-app"),
            &CloneOptions::default(),
        );
        assert_eq!(
            args,
            vec![
                "clone",
                "--depth",
                "1",
                "https://github.com/01jam/ui.git",
                "/work/my-app"
            ]
        );
    }

    #[test]
    fn test_clone_args_with_branch() {
        let options = CloneOptions {
            depth: 5,
            branch: Some("next".to_string()),
        };
        let args = clone_args("git@host:t.git", Utf8Path::new("/w/a"), &options);
        assert_eq!(
            args,
            vec!["clone", "--depth", "5", "--branch", "next", "git@host:t.git", "/w/a"]
        );
    }

    #[tokio::test]
    async fn test_clone_rejects_invalid_url() {
        let temp = TempDir::new().unwrap();
        let dest = temp_path(&temp).join("app");
        let err = GitCli::new()
            .shallow_clone("not-a-url", &dest, &CloneOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRepoUrl { .. }));
    }

    #[tokio::test]
    async fn test_clone_rejects_non_empty_destination() {
        let temp = TempDir::new().unwrap();
        let dest = temp_path(&temp);
        std::fs::write(dest.join("README.md"), "keep me").unwrap();

        let err = GitCli::new()
            .shallow_clone("https://example.com/t.git", &dest, &CloneOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DirectoryExists { .. }));
        assert_eq!(
            std::fs::read_to_string(dest.join("README.md")).unwrap(),
            "keep me"
        );
    }

    #[test]
    fn test_missing_program_is_command_not_found() {
        let git = GitCli::with_program("definitely-not-a-git-binary-4f9a");
        let err = git.ensure_available().unwrap_err();
        assert!(matches!(err, Error::CommandNotFound { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_clone_spawns_resolved_program() {
        use std::os::unix::fs::PermissionsExt;

        let bin = TempDir::new().unwrap();
        let script = bin.path().join("stub-git");
        std::fs::write(
            &script,
            "#!/bin/sh\nfor last; do :; done\nmkdir -p \"$last\"\nprintf '%s\\n' \"$*\" > \"$last/.args\"\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let temp = TempDir::new().unwrap();
        let dest = temp_path(&temp).join("app");
        let git = GitCli::with_program(script.to_str().unwrap());
        git.ensure_available().unwrap();
        git.shallow_clone("https://example.com/t.git", &dest, &CloneOptions::default())
            .await
            .unwrap();

        let args = std::fs::read_to_string(dest.join(".args")).unwrap();
        assert_eq!(
            args.trim(),
            format!("clone --depth 1 https://example.com/t.git {}", dest)
        );
    }

    #[tokio::test]
    async fn test_remove_git_metadata() {
        let temp = TempDir::new().unwrap();
        let dir = temp_path(&temp);
        std::fs::create_dir_all(dir.join(".git/objects")).unwrap();
        std::fs::write(dir.join(".git/HEAD"), "ref: refs/heads/main\n").unwrap();
        std::fs::write(dir.join("index.js"), "").unwrap();

        assert!(remove_git_metadata(&dir).await.unwrap());
        assert!(!dir.join(".git").exists());
        assert!(dir.join("index.js").exists());
    }

    #[tokio::test]
    async fn test_remove_git_metadata_when_absent() {
        let temp = TempDir::new().unwrap();
        assert!(!remove_git_metadata(&temp_path(&temp)).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_gitlink_file() {
        let temp = TempDir::new().unwrap();
        let dir = temp_path(&temp);
        std::fs::write(dir.join(".git"), "gitdir: ../.git/worktrees/app\n").unwrap();

        assert!(remove_git_metadata(&dir).await.unwrap());
        assert!(!dir.join(".git").exists());
    }

    #[tokio::test]
    async fn test_remove_git_metadata_fails_when_project_is_not_a_directory() {
        let temp = TempDir::new().unwrap();
        let project = temp_path(&temp).join("app");
        std::fs::write(&project, "not a directory").unwrap();

        let err = remove_git_metadata(&project).await.unwrap_err();
        assert!(matches!(err, Error::Filesystem { ref path, .. } if path.ends_with(".git")));
    }
}
