//! Error types for forge-ui-scaffold

use crate::types::Step;
use thiserror::Error;

/// Result type alias using forge-ui-scaffold's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Scaffolding error types
#[derive(Error, Debug)]
pub enum Error {
    /// No project directory was given on the command line
    #[error("Please specify the project directory")]
    MissingArgument,

    /// Project name rejected by package-name validation
    #[error("Cannot create a project named \"{name}\" because of npm naming restrictions")]
    InvalidName {
        name: String,
        errors: Vec<String>,
        warnings: Vec<String>,
    },

    /// Target directory already exists
    #[error("The directory {path} already exists, please give it another name")]
    DirectoryExists { path: String },

    /// Filesystem operation failed
    #[error("Filesystem error at {path}: {source}")]
    Filesystem {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// External command exited unsuccessfully
    #[error("{step} failed: `{command}` {message}")]
    SubprocessFailure {
        step: Step,
        command: String,
        message: String,
    },

    /// Required executable missing from PATH
    #[error("Required command not found: {command}. Please ensure it is installed and in PATH")]
    CommandNotFound { command: String },

    /// Invalid repository URL
    #[error("Invalid repository URL: {url}")]
    InvalidRepoUrl { url: String },

    /// Manifest could not be interpreted
    #[error("Invalid manifest {path}: {message}")]
    InvalidManifest { path: String, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid path
    #[error("Invalid path: {path}")]
    InvalidPath { path: String },

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid name error carrying every validation message
    pub fn invalid_name(name: impl Into<String>, errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            errors,
            warnings,
        }
    }

    /// Create a directory exists error
    pub fn directory_exists(path: impl Into<String>) -> Self {
        Self::DirectoryExists { path: path.into() }
    }

    /// Create a filesystem error for the given path
    pub fn filesystem(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Create a subprocess failure error
    pub fn subprocess_failure(
        step: Step,
        command: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::SubprocessFailure {
            step,
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create a command not found error
    pub fn command_not_found(command: impl Into<String>) -> Self {
        Self::CommandNotFound {
            command: command.into(),
        }
    }

    /// Create an invalid repo URL error
    pub fn invalid_repo_url(url: impl Into<String>) -> Self {
        Self::InvalidRepoUrl { url: url.into() }
    }

    /// Create an invalid manifest error
    pub fn invalid_manifest(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidManifest {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath { path: path.into() }
    }
}
