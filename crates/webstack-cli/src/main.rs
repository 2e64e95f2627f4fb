//! Webstack CLI - Project scaffolding for React / Node web stacks

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use webstack_core::tui::CreateArgs;
use webstack_core::ProductConfig;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Webstack product configuration
#[derive(Clone)]
pub struct WebstackConfig;

impl ProductConfig for WebstackConfig {
    fn name(&self) -> &'static str {
        "webstack"
    }

    fn display_name(&self) -> &'static str {
        "Webstack"
    }

    fn default_template_url(&self) -> &'static str {
        "https://raw.githubusercontent.com/webstack-dev/webstack/main/templates"
    }

    fn template_url_env(&self) -> &'static str {
        "WEBSTACK_TEMPLATE_URL"
    }

    fn bundled_templates(&self) -> Option<PathBuf> {
        Some(Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates"))
    }

    fn cli_description(&self) -> &'static str {
        "CLI for scaffolding React / Node web stack projects"
    }

    fn upgrade_command(&self) -> &'static str {
        "cargo install webstack-cli --force"
    }
}

#[derive(Parser, Debug)]
#[command(name = "webstack")]
#[command(about = "CLI for scaffolding React / Node web stack projects")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new project
    Create(CliCreateArgs),
    /// Build zip files for all templates in the template directory (for development use)
    BuildZips(BuildZipsArgs),
}

#[derive(Parser, Debug)]
pub struct CliCreateArgs {
    /// Local directory to use for templates instead of fetching from remote (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Template name to use
    #[arg(short, long)]
    pub template: Option<String>,

    /// Project directory to create
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Project name (defaults to the directory name)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Features to enable without asking (comma-separated: react,router,redux,mobx,node,mongo,api,jwt,heroku,jest,flow,wfloader)
    #[arg(short, long = "with", value_delimiter = ',')]
    pub with: Option<Vec<String>>,

    /// Write the project files only; skip git, install and the dev server
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            template_dir: args.template_dir,
            template: args.template,
            directory: args.directory,
            name: args.name,
            features: args.with,
            skip_install: args.skip_install,
            yes: args.yes,
        }
    }
}

#[derive(Parser, Debug)]
pub struct BuildZipsArgs {
    /// Local directory containing templates to build zips from (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,
}

async fn create(config: &WebstackConfig, args: CreateArgs) -> Result<()> {
    let result = webstack_core::run(config, args, CLI_VERSION).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let config = WebstackConfig;

    match args.command {
        Some(Command::Create(create_args)) => create(&config, create_args.into()).await,
        Some(Command::BuildZips(build_args)) => {
            webstack_core::templates::build_zips(&config, &build_args.template_dir).await
        }
        // No subcommand provided, default to create behavior (interactive mode)
        None => create(&config, CreateArgs::default()).await,
    }
}
