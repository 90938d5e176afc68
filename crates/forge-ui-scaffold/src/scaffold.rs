//! The scaffolding workflow
//!
//! A strict forward sequence: create the directory, clone the template,
//! install dependencies, drop git metadata, rename the manifest. Any failure
//! ends the run; nothing already written to disk is rolled back.

use crate::error::{Error, Result};
use crate::git::{remove_git_metadata, CloneOptions, SourceControl};
use crate::install::PackageInstaller;
use crate::manifest::rename_manifest;
use crate::types::{ScaffoldContext, ScaffoldOutcome, Step};
use camino::Utf8Path;
use std::future::Future;
use tracing::{debug, error, info};

/// Observer trait for workflow step events
///
/// Implement this trait to render progress. Callbacks arrive in step order
/// from a single task.
pub trait ScaffoldObserver: Send + Sync {
    /// Called before a step runs
    fn on_step_start(&self, step: Step);

    /// Called after a step succeeded
    fn on_step_complete(&self, step: Step);

    /// Called for a step the context asked to skip
    fn on_step_skipped(&self, step: Step) {
        let _ = step;
    }

    /// Called when a step failed; the run stops afterwards
    fn on_step_failed(&self, step: Step, error: &Error);
}

impl<T: ScaffoldObserver + ?Sized> ScaffoldObserver for Box<T> {
    fn on_step_start(&self, step: Step) {
        (**self).on_step_start(step)
    }

    fn on_step_complete(&self, step: Step) {
        (**self).on_step_complete(step)
    }

    fn on_step_skipped(&self, step: Step) {
        (**self).on_step_skipped(step)
    }

    fn on_step_failed(&self, step: Step, error: &Error) {
        (**self).on_step_failed(step, error)
    }
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl ScaffoldObserver for NoOpObserver {
    fn on_step_start(&self, _step: Step) {}
    fn on_step_complete(&self, _step: Step) {}
    fn on_step_failed(&self, _step: Step, _error: &Error) {}
}

/// Observer that logs events through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ScaffoldObserver for TracingObserver {
    fn on_step_start(&self, step: Step) {
        info!("{}...", step);
    }

    fn on_step_complete(&self, step: Step) {
        debug!("{}: done", step);
    }

    fn on_step_skipped(&self, step: Step) {
        info!("{}: skipped", step);
    }

    fn on_step_failed(&self, step: Step, err: &Error) {
        error!("{}: {}", step, err);
    }
}

/// Runs the workflow against a source-control client and a package installer
pub struct Scaffolder<S, I, O = NoOpObserver> {
    source_control: S,
    installer: I,
    observer: O,
}

impl<S, I> Scaffolder<S, I, NoOpObserver>
where
    S: SourceControl,
    I: PackageInstaller,
{
    pub fn new(source_control: S, installer: I) -> Self {
        Self {
            source_control,
            installer,
            observer: NoOpObserver,
        }
    }
}

impl<S, I, O> Scaffolder<S, I, O>
where
    S: SourceControl,
    I: PackageInstaller,
    O: ScaffoldObserver,
{
    /// Replace the observer
    pub fn with_observer<O2: ScaffoldObserver>(self, observer: O2) -> Scaffolder<S, I, O2> {
        Scaffolder {
            source_control: self.source_control,
            installer: self.installer,
            observer,
        }
    }

    /// Scaffold the project described by `ctx`
    ///
    /// # Errors
    /// Returns error if:
    /// - the target path already exists (nothing is touched)
    /// - git or the package manager is not on PATH (nothing is created)
    /// - any step fails (the partially populated directory stays on disk)
    pub async fn run(&self, ctx: &ScaffoldContext) -> Result<ScaffoldOutcome> {
        let project_dir = ctx.request.target_path();
        info!(
            "Scaffolding {} into {} from {}",
            ctx.request.name(),
            project_dir,
            ctx.template.url
        );

        if path_exists(project_dir).await {
            return Err(Error::directory_exists(project_dir.as_str()));
        }

        self.source_control.ensure_available()?;
        if !ctx.skip_install {
            self.installer.ensure_available()?;
        }

        self.step(Step::CreateDirectory, create_project_dir(project_dir))
            .await?;

        let clone_options = CloneOptions {
            depth: ctx.template.depth,
            branch: ctx.template.branch.clone(),
        };
        self.step(
            Step::CloneTemplate,
            self.source_control
                .shallow_clone(&ctx.template.url, project_dir, &clone_options),
        )
        .await?;

        if ctx.skip_install {
            self.observer.on_step_skipped(Step::InstallDependencies);
        } else {
            self.step(
                Step::InstallDependencies,
                self.installer.install(project_dir),
            )
            .await?;
        }

        self.step(Step::RemoveGitMetadata, remove_git_metadata(project_dir))
            .await?;

        let manifest_path = ctx.manifest_path();
        self.step(
            Step::RewriteManifest,
            rename_manifest(&manifest_path, ctx.request.name()),
        )
        .await?;

        info!("Project {} ready at {}", ctx.request.name(), project_dir);

        Ok(ScaffoldOutcome {
            project_dir: project_dir.to_path_buf(),
            manifest_path,
            package_manager: ctx.package_manager,
            installed: !ctx.skip_install,
        })
    }

    async fn step<T, F>(&self, step: Step, operation: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.observer.on_step_start(step);
        match operation.await {
            Ok(value) => {
                self.observer.on_step_complete(step);
                Ok(value)
            }
            Err(err) => {
                self.observer.on_step_failed(step, &err);
                Err(err)
            }
        }
    }
}

/// Also true for dangling symlinks, which `create_dir` would trip over
async fn path_exists(path: &Utf8Path) -> bool {
    tokio::fs::symlink_metadata(path).await.is_ok()
}

/// Create exactly one directory level; a collision is reported, not reused
async fn create_project_dir(path: &Utf8Path) -> Result<()> {
    match tokio::fs::create_dir(path).await {
        Ok(()) => {
            debug!("Created {}", path);
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            Err(Error::directory_exists(path.as_str()))
        }
        Err(e) => Err(Error::filesystem(path.as_str(), e)),
    }
}
