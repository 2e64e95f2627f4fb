//! Charm-style CLI prompts using cliclack

use crate::config::questions::{self, ignored_presets, slugify, Question};
use crate::config::{
    collect, parse_feature, Answers, ConfigRecord, DefaultsPrompter, Environment, Prompter,
};
use crate::product::ProductConfig;
use crate::resolver;
use crate::runtime::{check, setup, tool};
use crate::templates::{
    materialize, version, TemplateFetcher, TemplateManifest, TemplateSource,
};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Local directory to use for templates instead of fetching from remote
    pub template_dir: Option<PathBuf>,

    /// Template name to use
    pub template: Option<String>,

    /// Project directory to create
    pub directory: Option<PathBuf>,

    /// Project name (skips the name question)
    pub name: Option<String>,

    /// Features to enable without asking (react, router, redux, node, ...)
    pub features: Option<Vec<String>>,

    /// Stop after writing files; print the setup commands instead of running them
    pub skip_install: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Asks each visible question through cliclack
struct CliclackPrompter;

impl Prompter for CliclackPrompter {
    fn confirm(&mut self, question: &Question, default: bool) -> Result<bool> {
        Ok(cliclack::confirm(question.message)
            .initial_value(default)
            .interact()?)
    }

    fn input(&mut self, question: &Question, default: &str) -> Result<String> {
        Ok(cliclack::input(question.message)
            .placeholder(default)
            .default_input(default)
            .interact()?)
    }
}

/// Run the CLI with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs, cli_version: &str) -> Result<()> {
    cliclack::intro(config.display_name())?;

    // Step 1: Detect node / yarn
    let environment = detect_environment()?;

    // Step 2: Setup template fetcher
    let mut fetcher = setup_fetcher(config, &args.template_dir)?;

    // Step 3: Select template
    let (template_name, manifest) = select_template(&mut fetcher, args.template.as_deref()).await?;

    if let Some(warning) =
        version::check_compatibility(cli_version, &manifest.version, config.upgrade_command())
    {
        cliclack::log::warning(format!(
            "Version warning: {}",
            warning.lines().next().unwrap_or(&warning)
        ))?;
    }

    // Step 4: Select directory
    let project_dir = select_directory(&args)?;

    // Step 5: Ask the feature questions
    let record = collect_record(&args, &project_dir, environment)?;
    print_summary(&record)?;

    // Step 6: Check the tools the setup commands need
    let mut create_heroku_app = false;
    if !args.skip_install {
        check_setup_tools(&record)?;
        if record.heroku() {
            create_heroku_app = handle_heroku_check(config, &args).await?;
        }
    }

    // Step 7: Write the project
    create_project(&mut fetcher, &template_name, &manifest, &record, &project_dir).await?;

    // Step 8: Run setup commands, or show them
    if args.skip_install {
        print_next_steps(config, &project_dir, &record)?;
        return Ok(());
    }

    cliclack::outro("Running setup commands")?;
    let plan = setup::SetupPlan::for_record(&record, config, create_heroku_app);
    setup::run_setup(&plan, &project_dir, &mut setup::Display::new()).await?;

    Ok(())
}

fn detect_environment() -> Result<Environment> {
    let spinner = cliclack::spinner();
    spinner.start("Checking runtimes...");

    let (environment, runtimes) = check::detect_environment();
    let runtime_info: Vec<String> = runtimes.iter().map(|r| r.describe()).collect();
    spinner.stop(format!("Detected runtimes: {}", runtime_info.join(", ")));

    if environment.node_version == "*" {
        cliclack::log::warning(
            "Node.js version unknown; the generated engines field will accept any version",
        )?;
    }

    let manager = if environment.yarn { "yarn" } else { "npm" };
    cliclack::log::info(format!("Package manager: {}", manager))?;

    Ok(environment)
}

fn setup_fetcher<C: ProductConfig>(
    config: &C,
    template_dir: &Option<PathBuf>,
) -> Result<TemplateFetcher> {
    let fetcher = match template_dir {
        Some(path) => {
            cliclack::log::info(format!("Using local templates from {}", path.display()))?;
            TemplateFetcher::from_local(path.clone(), config.user_agent())
        }
        None => {
            let fetcher = TemplateFetcher::from_config(config)?;
            match fetcher.source() {
                TemplateSource::Local(path) => cliclack::log::info(format!(
                    "Using bundled templates from {}",
                    path.display()
                ))?,
                TemplateSource::Remote(url) => {
                    cliclack::log::info(format!("Using remote templates from {}", url))?
                }
            }
            fetcher
        }
    };

    Ok(fetcher)
}

async fn select_template(
    fetcher: &mut TemplateFetcher,
    specified_template: Option<&str>,
) -> Result<(String, TemplateManifest)> {
    let spinner = cliclack::spinner();
    spinner.start("Loading templates...");

    let root_manifest = match fetcher.fetch_root_manifest().await {
        Ok(manifest) => manifest,
        Err(e) => {
            spinner.stop("Failed to load templates");
            return Err(e);
        }
    };

    let template_name = match specified_template.or_else(|| root_manifest.default_template()) {
        Some(name) => name.to_string(),
        None => {
            spinner.stop("Failed to load templates");
            anyhow::bail!("No templates found.");
        }
    };

    if !root_manifest.contains(&template_name) {
        spinner.stop("Failed to load templates");
        anyhow::bail!(
            "Template '{}' not found. Available templates: {}",
            template_name,
            root_manifest.templates.join(", ")
        );
    }

    let manifest = fetcher.fetch_template_manifest(&template_name).await?;
    spinner.stop(format!(
        "Template: {} - {}",
        manifest.name, manifest.description
    ));

    Ok((template_name, manifest))
}

fn select_directory(args: &CreateArgs) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let path = if let Some(dir) = &args.directory {
        let p = if dir.is_absolute() {
            dir.clone()
        } else {
            current_dir.join(dir)
        };
        cliclack::log::info(format!("Using directory: {}", p.display()))?;
        p
    } else if args.yes {
        current_dir
    } else {
        let input: String = cliclack::input("Project directory")
            .placeholder(".")
            .default_input(".")
            .interact()?;

        if input.is_empty() || input == "." {
            current_dir
        } else {
            let p = PathBuf::from(&input);
            if p.is_absolute() {
                p
            } else {
                current_dir.join(p)
            }
        }
    };

    if let Some(parent) = path.parent() {
        if !parent.exists() && parent != Path::new("") {
            anyhow::bail!("Parent directory does not exist: {}", parent.display());
        }
    }

    // Warn if directory exists and has files
    if path.is_dir() {
        if let Ok(entries) = std::fs::read_dir(&path) {
            let count = entries.count();
            if count > 0 {
                cliclack::log::warning(format!("Directory has {} existing items", count))?;

                let confirm = if args.yes {
                    true
                } else {
                    cliclack::confirm("Continue anyway?")
                        .initial_value(true)
                        .interact()?
                };

                if !confirm {
                    anyhow::bail!("Setup cancelled.");
                }
            }
        }
    }

    Ok(path)
}

/// Answers given on the command line
fn presets(args: &CreateArgs) -> Result<Answers> {
    let mut presets = Answers::new();

    if let Some(name) = &args.name {
        presets.set_text(questions::NAME, name.clone());
    }

    for feature in args.features.iter().flatten() {
        match parse_feature(feature) {
            Some(key) => presets.set_bool(key, true),
            None => cliclack::log::warning(format!("Unknown feature: {}", feature))?,
        }
    }

    Ok(presets)
}

fn collect_record(
    args: &CreateArgs,
    project_dir: &Path,
    environment: Environment,
) -> Result<ConfigRecord> {
    let presets = presets(args)?;
    let default_name = project_dir
        .file_name()
        .map(|n| slugify(&n.to_string_lossy()))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "webstack-app".to_string());

    let answers = if args.yes {
        collect(&mut DefaultsPrompter, &presets, &default_name)?
    } else {
        collect(&mut CliclackPrompter, &presets, &default_name)?
    };

    for key in ignored_presets(&presets, &answers) {
        cliclack::log::warning(format!(
            "Ignoring '{}': the feature it depends on is not enabled",
            key
        ))?;
    }

    Ok(ConfigRecord::from_answers(&answers, environment)?)
}

fn print_summary(record: &ConfigRecord) -> Result<()> {
    let features = record.feature_labels();
    if features.is_empty() {
        cliclack::log::success(format!("Project {}: plain HTML / CSS / JS", record.name))?;
    } else {
        cliclack::log::success(format!(
            "Project {}: {}",
            record.name,
            features.join(", ")
        ))?;
    }
    Ok(())
}

fn check_setup_tools(record: &ConfigRecord) -> Result<()> {
    match check::check_setup_tools(record) {
        Ok(tools) => {
            let info: Vec<String> = tools.iter().map(|t| t.describe()).collect();
            cliclack::log::info(format!("Setup tools: {}", info.join(", ")))?;
            Ok(())
        }
        Err(e) => {
            cliclack::log::error(format!("{}", e))?;
            anyhow::bail!("Please install the missing tools, or rerun with --skip-install.");
        }
    }
}

/// Returns whether the Heroku app should be created during setup
async fn handle_heroku_check<C: ProductConfig>(config: &C, args: &CreateArgs) -> Result<bool> {
    let tool = tool::heroku_tool(config.heroku_docs_url());
    let name = tool.config().display_name;

    if let Some(version) = tool.get_version() {
        cliclack::log::success(format!("{} installed ({})", name, version))?;
        return Ok(true);
    }

    cliclack::log::warning(format!("{} is not installed", name))?;

    if args.yes {
        cliclack::log::info("Continuing without creating a Heroku app (--yes mode)")?;
        return Ok(false);
    }

    let action: &str = cliclack::select("What would you like to do?")
        .item("install", format!("Install {} automatically", name), "")
        .item("docs", format!("Open documentation ({})", tool.config().docs_url), "")
        .item("skip", "Skip creating the Heroku app", "")
        .interact()?;

    match action {
        "install" => {
            cliclack::log::info(format!("This will execute: {}", tool.install_command()))?;

            let confirm: bool = cliclack::confirm("Proceed with installation?")
                .initial_value(true)
                .interact()?;

            if !confirm {
                cliclack::log::info("Continuing without creating a Heroku app")?;
                return Ok(false);
            }

            match tool.install().await {
                Ok(()) => {
                    cliclack::log::success(format!("{} installed successfully", name))?;
                    Ok(true)
                }
                Err(e) => {
                    cliclack::log::error(format!("{}", e))?;

                    let continue_anyway: bool =
                        cliclack::confirm("Continue without creating a Heroku app?")
                            .initial_value(false)
                            .interact()?;

                    if !continue_anyway {
                        anyhow::bail!("Setup cancelled.");
                    }
                    Ok(false)
                }
            }
        }
        "docs" => {
            tool.open_docs()?;
            cliclack::outro(format!("After installing {}, run this command again.", name))?;
            std::process::exit(0);
        }
        _ => {
            cliclack::log::info(format!(
                "Continuing without creating a Heroku app. Run `heroku create --region {}` later.",
                config.heroku_region()
            ))?;
            Ok(false)
        }
    }
}

async fn create_project(
    fetcher: &mut TemplateFetcher,
    template_name: &str,
    manifest: &TemplateManifest,
    record: &ConfigRecord,
    project_dir: &Path,
) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Creating project...");

    let resolution = resolver::resolve(record);
    let report = match materialize(
        fetcher,
        template_name,
        manifest,
        &resolution,
        record,
        project_dir,
    )
    .await
    {
        Ok(report) => report,
        Err(e) => {
            spinner.stop("Failed to create project");
            return Err(e);
        }
    };

    spinner.stop(format!(
        "Created {} files and {} directories in {}",
        report.files.len(),
        report.directories.len(),
        project_dir.display()
    ));

    for (dir, error) in &report.skipped_directories {
        cliclack::log::warning(format!("Could not create {}: {}", dir, error))?;
    }

    Ok(())
}

fn print_next_steps<C: ProductConfig>(
    config: &C,
    project_dir: &Path,
    record: &ConfigRecord,
) -> Result<()> {
    let steps = config.next_steps(project_dir, record);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}
