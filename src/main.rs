//! gitlab-ci-linter - lint your .gitlab-ci.yml using the GitLab CI lint API.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gitlab_ci_linter::cli::{self, output, Cli, Commands};
use gitlab_ci_linter::config::{FileConfig, Settings};
use gitlab_ci_linter::Error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let (command, options, path) = cli.into_command();

    // Logs go to stderr; stdout carries the results.
    let directive = if options.verbose {
        "gitlab_ci_linter=debug"
    } else {
        "gitlab_ci_linter=warn"
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive)))
        .init();

    if options.no_color {
        owo_colors::set_override(false);
    }

    let code = match run(command, &options, path).await {
        Ok(code) => code,
        Err(e) => {
            output::error(&e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}

async fn run(
    command: Commands,
    options: &cli::GlobalOptions,
    path: Option<std::path::PathBuf>,
) -> Result<i32, Error> {
    if let Commands::Version = command {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(0);
    }

    let file = FileConfig::load(options.config.as_deref())?;
    let settings = Settings::resolve(options, path.as_deref(), file)?;

    match command {
        Commands::Check(_) => cli::check::run(&settings).await,
        Commands::Install(_) => cli::install::run(&settings).await,
        Commands::Uninstall(_) => cli::uninstall::run(&settings),
        Commands::Version => Ok(0),
    }
}
