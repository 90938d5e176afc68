//! # forge-ui-scaffold
//!
//! Project scaffolding library for the create-forge-ui CLI providing:
//! - npm package-name validation
//! - Shallow cloning of the template repository
//! - Dependency installation through a package manager
//! - Manifest renaming that preserves every other field
//! - Layered configuration (embedded defaults, user file, environment)
//!
//! # Examples
//!
//! ## Scaffold a project
//!
//! ```no_run
//! use forge_ui_scaffold::{
//!     CommandInstaller, ConfigLoader, GitCli, ProjectRequest, Scaffolder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::new(None).load()?;
//! let request = ProjectRequest::in_current_dir("my-app")?;
//! let installer = CommandInstaller::new(config.package_manager);
//! let ctx = config.into_context(request, false);
//!
//! let outcome = Scaffolder::new(GitCli::new(), installer).run(&ctx).await?;
//! println!("created {}", outcome.project_dir);
//! # Ok(())
//! # }
//! ```
//!
//! ## Validate a name
//!
//! ```
//! use forge_ui_scaffold::name::validate_package_name;
//!
//! let result = validate_package_name("Invalid Name!");
//! assert!(!result.valid_for_new_packages);
//! assert_eq!(result.errors.len(), 1);
//! assert_eq!(result.warnings.len(), 2);
//! ```

pub mod config;
pub mod error;
pub mod git;
pub mod install;
pub mod manifest;
pub mod name;
mod process;
pub mod scaffold;
pub mod types;

pub use error::{Error, Result};

// Re-export the workflow surface for convenience
pub use config::{ConfigLoader, ScaffoldConfig};
pub use git::{CloneOptions, GitCli, SourceControl};
pub use install::{CommandInstaller, PackageInstaller};
pub use manifest::Manifest;
pub use scaffold::{NoOpObserver, ScaffoldObserver, Scaffolder, TracingObserver};
pub use types::{
    PackageManager, ProjectRequest, ScaffoldContext, ScaffoldOutcome, Step, TemplateSource,
};
