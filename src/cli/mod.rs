//! CLI commands for gitlab-ci-linter.

pub mod check;
pub mod hooks;
pub mod install;
pub mod output;
pub mod project;
pub mod uninstall;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

const LONG_ABOUT: &str = "\
Lint your .gitlab-ci.yml using the GitLab CI lint API.

The lint API is tied to a GitLab project, so the tool needs to know which
project (on which GitLab instance) to target. By default it is detected from
the 'origin' remote of the git repository: a remote such as
'https://gitlab.com/group/project.git' or 'git@gitlab.com:group/project.git'
targets project 'group/project' on 'https://gitlab.com'.

Use --gitlab-url, --project-path or --project-id when detection does not work
or to target another project. --project-id has precedence over --project-path.

Instances that require authentication (gitlab.com does) need a personal access
token, given with --personal-access-token or read with --netrc from the
'account' field of the matching 'machine' entry of a .netrc file.";

/// gitlab-ci-linter - lint your .gitlab-ci.yml using the GitLab CI lint API
#[derive(Parser, Debug)]
#[command(name = "gitlab-ci-linter")]
#[command(version, about, long_about = LONG_ABOUT)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub options: GlobalOptions,

    /// A gitlab-ci file to check, or a directory to search from. Has
    /// precedence over --ci-file and --directory
    pub path: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check the .gitlab-ci.yml (default command if none is given)
    #[command(visible_alias = "c")]
    Check(PathArgs),

    /// Install as git pre-commit hook
    #[command(visible_alias = "i")]
    Install(PathArgs),

    /// Uninstall the git pre-commit hook
    #[command(visible_alias = "u")]
    Uninstall(PathArgs),

    /// Print the version information
    Version,
}

#[derive(Args, Debug, Default)]
pub struct PathArgs {
    /// A gitlab-ci file to check, or a directory to search from
    pub path: Option<PathBuf>,
}

/// Options shared by every command.
#[derive(Args, Debug, Default)]
pub struct GlobalOptions {
    /// Root URL of the GitLab instance (default: detected from the origin
    /// remote, else https://gitlab.com)
    #[arg(short = 'u', long, env = "GCL_GITLAB_URL", global = true, value_name = "URL")]
    pub gitlab_url: Option<String>,

    /// Path of the gitlab-ci file to check
    #[arg(short = 'f', long, env = "GCL_GITLAB_CI_FILE", global = true, value_name = "FILE")]
    pub ci_file: Option<PathBuf>,

    /// Directory from where to search for the gitlab-ci file and the git repository
    #[arg(short = 'd', long, env = "GCL_DIRECTORY", global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Personal access token. Has precedence over .netrc
    #[arg(
        short = 'p',
        long,
        env = "GCL_PERSONAL_ACCESS_TOKEN",
        global = true,
        value_name = "TOK",
        hide_env_values = true
    )]
    pub personal_access_token: Option<String>,

    /// Read the personal access token from the 'account' field of .netrc
    #[arg(short = 'n', long, env = "GCL_NETRC", global = true)]
    pub netrc: bool,

    /// Path of the .netrc file (default: $NETRC, else ~/.netrc)
    #[arg(long, env = "GCL_NETRC_FILE", global = true, value_name = "FILE")]
    pub netrc_file: Option<PathBuf>,

    /// Path of the GitLab project. Has precedence over the origin remote
    #[arg(short = 'P', long, env = "GCL_PROJECT_PATH", global = true, value_name = "PATH")]
    pub project_path: Option<String>,

    /// ID of the GitLab project. Has precedence over --project-path
    #[arg(short = 'I', long, env = "GCL_PROJECT_ID", global = true, value_name = "ID")]
    pub project_id: Option<String>,

    /// HTTP request timeout, in seconds [default: 15]
    #[arg(short = 't', long, env = "GCL_TIMEOUT", global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Don't color output
    #[arg(long, env = "GCL_NOCOLOR", global = true)]
    pub no_color: bool,

    /// Verbose mode
    #[arg(short = 'v', long, env = "GCL_VERBOSE", global = true)]
    pub verbose: bool,

    /// Print the merged yaml returned by the API
    #[arg(short = 'm', long, env = "GCL_INCLUDE_MERGED_YAML", global = true)]
    pub merged_yaml: bool,

    /// Run a pipeline creation simulation
    #[arg(short = 's', long, env = "GCL_DRY_RUN", global = true)]
    pub dry_run: bool,

    /// Branch or tag used as context by --dry-run (default: the project's default branch)
    #[arg(long, env = "GCL_DRY_RUN_REF", global = true, value_name = "REF")]
    pub dry_run_ref: Option<String>,

    /// Configuration file (default: <config dir>/gitlab-ci-linter/config.toml)
    #[arg(long, env = "GCL_CONFIG", global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// The command to run, `check` when none is given, with its PATH argument.
    pub fn into_command(self) -> (Commands, GlobalOptions, Option<PathBuf>) {
        let command = self.command.unwrap_or(Commands::Check(PathArgs::default()));
        let path = match &command {
            Commands::Check(args) | Commands::Install(args) | Commands::Uninstall(args) => {
                args.path.clone()
            }
            Commands::Version => None,
        };

        (command, self.options, path.or(self.path))
    }
}
