//! Project creation command handler

use anyhow::{Context, Result};
use console::style;
use forge_ui_scaffold::{
    CommandInstaller, ConfigLoader, Error, GitCli, ProjectRequest, ScaffoldConfig,
    ScaffoldObserver, ScaffoldOutcome, Scaffolder, TracingObserver,
};

use crate::cli::Cli;
use crate::output;
use crate::progress::SpinnerObserver;

const BIN_NAME: &str = "create-forge-ui";

/// Create a new project from the template
pub async fn run(cli: Cli) -> Result<()> {
    let name = cli.project_directory.as_deref().ok_or(Error::MissingArgument)?;

    // Reject bad names before reading any configuration or touching disk
    let request = ProjectRequest::in_current_dir(name)?;

    let config = load_config(&cli)?;
    let package_manager = config.package_manager;
    let template_url = config.template.url.clone();
    let ctx = config.into_context(request, cli.skip_install);

    if !cli.quiet {
        output::header("Create Forge UI Project");
        output::kv("Project name", ctx.request.name());
        output::kv("Location", ctx.request.target_path().as_str());
        output::kv("Template", &template_url);
        if let Some(branch) = &ctx.template.branch {
            output::kv("Branch", branch);
        }
        output::kv("Package manager", package_manager.as_str());
        println!();
    }

    // Spinners would interleave with log lines, so verbose runs log steps instead
    let observer: Box<dyn ScaffoldObserver> = if cli.verbose > 0 {
        Box::new(TracingObserver)
    } else {
        Box::new(SpinnerObserver::new(cli.quiet))
    };
    let scaffolder = Scaffolder::new(GitCli::new(), CommandInstaller::new(package_manager))
        .with_observer(observer);
    let outcome = scaffolder.run(&ctx).await?;

    if !cli.quiet {
        print_next_steps(ctx.request.name(), &outcome);
    }

    Ok(())
}

/// Config file and environment, then command-line flags on top
fn load_config(cli: &Cli) -> Result<ScaffoldConfig> {
    let mut config = ConfigLoader::new(cli.config.as_deref())
        .load()
        .context("Failed to load configuration")?;

    if let Some(url) = &cli.template {
        config.template.url = url.clone();
    }
    if let Some(branch) = &cli.branch {
        config.template.branch = Some(branch.clone());
    }
    if let Some(package_manager) = cli.package_manager {
        config.package_manager = package_manager;
    }

    config.validate()?;
    Ok(config)
}

fn print_next_steps(name: &str, outcome: &ScaffoldOutcome) {
    let pm = outcome.package_manager.as_str();

    println!();
    output::success(&format!("Project '{}' created successfully", name));
    output::kv("Location", outcome.project_dir.as_str());

    println!();
    output::info("Next steps:");
    println!("   1. cd {}", outcome.project_dir);
    if outcome.installed {
        println!("   2. {} start", pm);
    } else {
        println!("   2. {} install", pm);
        println!("   3. {} start", pm);
    }
}

/// Print an error the way the user should see it
pub fn report_error(err: &anyhow::Error) {
    match err.downcast_ref::<Error>() {
        Some(Error::MissingArgument) => report_missing_argument(),
        Some(Error::InvalidName {
            name,
            errors,
            warnings,
        }) => {
            output::error(&format!(
                "Cannot create a project named {} because of npm naming restrictions:",
                style(format!("\"{}\"", name)).green()
            ));
            eprintln!();
            for message in errors.iter().chain(warnings) {
                output::bullet(message);
            }
            eprintln!();
            eprintln!("Please choose a different project name.");
        }
        _ => output::error(&format!("{:#}", err)),
    }
}

fn report_missing_argument() {
    output::error("Please specify the project directory:");
    eprintln!(
        "  {} {}",
        style(BIN_NAME).cyan(),
        style("<project-directory>").green()
    );
    eprintln!();
    eprintln!("For example:");
    eprintln!("  {} {}", style(BIN_NAME).cyan(), style("my-react-app").green());
    eprintln!();
    eprintln!(
        "Run {} to see all options.",
        style(format!("{} --help", BIN_NAME)).cyan()
    );
}
