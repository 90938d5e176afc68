//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::Parser;
use forge_ui_scaffold::PackageManager;

/// Create a new Forge UI project from the template repository
#[derive(Parser, Debug)]
#[command(name = "create-forge-ui")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Name of the project; also the directory created for it
    #[arg(value_name = "PROJECT_DIRECTORY")]
    pub project_directory: Option<String>,

    /// Template repository to clone
    #[arg(long, value_name = "URL")]
    pub template: Option<String>,

    /// Template branch to check out
    #[arg(long, value_name = "NAME")]
    pub branch: Option<String>,

    /// Package manager used to install dependencies (npm, yarn, pnpm, bun)
    #[arg(long, value_name = "MANAGER")]
    pub package_manager: Option<PackageManager>,

    /// Do not install dependencies
    #[arg(long)]
    pub skip_install: bool,

    /// Path to a config file (default: ~/.forge-ui/config.yaml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_full_invocation() {
        let cli = Cli::try_parse_from([
            "create-forge-ui",
            "my-app",
            "--template",
            "git@github.com:acme/ui.git",
            "--branch",
            "next",
            "--package-manager",
            "pnpm",
            "--skip-install",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.project_directory.as_deref(), Some("my-app"));
        assert_eq!(cli.template.as_deref(), Some("git@github.com:acme/ui.git"));
        assert_eq!(cli.branch.as_deref(), Some("next"));
        assert_eq!(cli.package_manager, Some(PackageManager::Pnpm));
        assert!(cli.skip_install);
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_project_directory_is_optional_for_parsing() {
        let cli = Cli::try_parse_from(["create-forge-ui"]).unwrap();
        assert!(cli.project_directory.is_none());
    }

    #[test]
    fn test_unknown_package_manager_rejected() {
        let result = Cli::try_parse_from(["create-forge-ui", "my-app", "--package-manager", "cargo"]);
        assert!(result.is_err());
    }
}
