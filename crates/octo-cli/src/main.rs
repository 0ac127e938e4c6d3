//! Octo - bulk release promotion
//!
//! Usage:
//!   octo deploy-all Staging Production --space "Default Space"
//!   octo promote "Default Space" "API Service" --to Production
//!   octo spaces

mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use octo_core::commands::BrowseCommand;
use octo_core::config::ConfigStore;
use octo_core::context::OctoContext;
use octo_core::promotion::{PromotionOrchestrator, PromotionRequest};
use octo_core::resolve::ProjectFilter;

use crate::output::{OutputFormat, StderrProgress};

/// Exit status when at least one project failed to promote.
const EXIT_PROMOTION_FAILED: i32 = 2;

#[derive(Parser)]
#[command(name = "octo", version)]
#[command(about = "Promote releases between deployment environments", long_about = None)]
struct Cli {
    /// Config file to use instead of the default locations
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    format: OutputFormat,

    /// Log decisions and requests to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all spaces
    Spaces,

    /// List environments in a space
    Environments {
        /// Space name
        space: String,
    },

    /// List projects in a space
    Projects {
        /// Space name
        space: String,
    },

    /// List releases of a project
    Releases {
        /// Space name
        space: String,
        /// Project name
        project: String,
    },

    /// Show the release most recently deployed to an environment
    LatestRelease {
        /// Space name
        space: String,
        /// Project name
        project: String,
        /// Environment name
        #[arg(long, short, default_value = "staging")]
        environment: String,
    },

    /// Promote one project's latest release to another environment
    Promote {
        /// Space name
        space: String,
        /// Project name
        project: String,
        /// Source environment
        #[arg(long, default_value = "staging")]
        from: String,
        /// Target environment
        #[arg(long, default_value = "QA")]
        to: String,
        /// Show what would be deployed without deploying
        #[arg(long)]
        dry_run: bool,
    },

    /// Promote every project in a space from one environment to another
    DeployAll(DeployAllArgs),
}

#[derive(Args)]
struct DeployAllArgs {
    /// Environment to promote from
    source_environment: String,
    /// Environment to promote to
    target_environment: String,
    /// Space name
    #[arg(long, short)]
    space: String,
    /// Only include projects whose name contains this text
    #[arg(long)]
    filter: Option<String>,
    /// Skip projects whose name contains this text (repeatable)
    #[arg(long, value_name = "TEXT")]
    exclude: Vec<String>,
    /// Show what would be deployed without deploying
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = run(cli)?;
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    let ctx = connect(cli.config)?;
    let format = cli.format;

    match cli.command {
        Commands::Spaces => {
            let spaces = BrowseCommand::new(&ctx).spaces()?;
            output::print_named(&spaces, "No spaces found", format)?;
        }
        Commands::Environments { space } => {
            let environments = BrowseCommand::new(&ctx).environments(&space)?;
            output::print_named(&environments, "No environments found", format)?;
        }
        Commands::Projects { space } => {
            let projects = BrowseCommand::new(&ctx).projects(&space)?;
            output::print_named(&projects, "No projects found", format)?;
        }
        Commands::Releases { space, project } => {
            let releases = BrowseCommand::new(&ctx).releases(&space, &project)?;
            output::print_releases(&releases, format)?;
        }
        Commands::LatestRelease {
            space,
            project,
            environment,
        } => {
            let latest = BrowseCommand::new(&ctx).latest_release(&space, &project, &environment)?;
            output::print_latest_release(&latest, format)?;
        }
        Commands::Promote {
            space,
            project,
            from,
            to,
            dry_run,
        } => {
            let request = PromotionRequest::new(space, from, to)
                .with_project(project)
                .with_dry_run(dry_run);
            return promote(&ctx, &request, format);
        }
        Commands::DeployAll(args) => {
            return promote(&ctx, &deploy_all_request(args), format);
        }
    }

    Ok(0)
}

fn connect(config: Option<PathBuf>) -> Result<OctoContext> {
    let store = match config {
        Some(path) => ConfigStore::from_path(path),
        None => ConfigStore::from_default_locations()?,
    };
    let server = store.load()?;
    debug!("Connecting to {}", server.server_url);
    OctoContext::connect(server).context("Failed to initialize the API client")
}

fn deploy_all_request(args: DeployAllArgs) -> PromotionRequest {
    let mut filter = ProjectFilter::new().with_excludes(args.exclude);
    if let Some(text) = args.filter {
        filter = filter.with_filter(text);
    }

    PromotionRequest::new(args.space, args.source_environment, args.target_environment)
        .with_filter(filter)
        .with_dry_run(args.dry_run)
}

fn promote(ctx: &OctoContext, request: &PromotionRequest, format: OutputFormat) -> Result<i32> {
    let mut progress = StderrProgress::new(format, request);
    let report = PromotionOrchestrator::new(ctx).run_with_observer(request, &mut progress)?;

    output::print_report(&report, format)?;

    Ok(if report.has_failures() {
        EXIT_PROMOTION_FAILED
    } else {
        0
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn deploy_all_collects_repeated_excludes() {
        let cli = parse(&[
            "octo",
            "deploy-all",
            "Staging",
            "Production",
            "--space",
            "Default Space",
            "--filter",
            "api",
            "--exclude",
            "legacy",
            "--exclude",
            "test",
            "--dry-run",
        ]);

        let Commands::DeployAll(args) = cli.command else {
            panic!("expected deploy-all");
        };
        let request = deploy_all_request(args);

        assert_eq!(request.space, "Default Space");
        assert_eq!(request.source_environment, "Staging");
        assert_eq!(request.target_environment, "Production");
        assert_eq!(request.filter.filter.as_deref(), Some("api"));
        assert_eq!(request.filter.exclude, vec!["legacy", "test"]);
        assert!(request.dry_run);
    }

    #[test]
    fn deploy_all_requires_space() {
        let result = Cli::try_parse_from(["octo", "deploy-all", "Staging", "Production"]);
        assert!(result.is_err());
    }

    #[test]
    fn promote_defaults_to_staging_and_qa() {
        let cli = parse(&["octo", "promote", "Default Space", "API Service"]);

        let Commands::Promote { from, to, dry_run, .. } = cli.command else {
            panic!("expected promote");
        };
        assert_eq!(from, "staging");
        assert_eq!(to, "QA");
        assert!(!dry_run);
    }

    #[test]
    fn global_options_follow_the_subcommand() {
        let cli = parse(&["octo", "spaces", "--format", "json", "-v", "--config", "octo.toml"]);

        assert!(matches!(cli.format, OutputFormat::Json));
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("octo.toml")));
    }
}
