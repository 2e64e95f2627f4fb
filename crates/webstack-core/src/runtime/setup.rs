//! Post-generation setup commands
//!
//! The commands run one after another in the project directory, attached to
//! the terminal. The first failure stops the sequence.

use crate::config::ConfigRecord;
use crate::product::ProductConfig;
use colored::Colorize;
use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;
use tokio::process::Command;

/// Full terminal reset (`ESC c`)
const FULL_RESET: &str = "\x1bc";
/// Clear screen and move the cursor home
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[0f";

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` exited with {}", describe_exit(.code))]
    Failed { command: String, code: Option<i32> },

    #[error("failed to clear the terminal: {0}")]
    Display(#[from] io::Error),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("code {}", c),
        None => "a signal".to_string(),
    }
}

/// One step of the setup sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupStep {
    Run {
        program: &'static str,
        args: Vec<String>,
    },
    ClearScreen,
}

impl SetupStep {
    fn run(program: &'static str, args: &[&str]) -> Self {
        SetupStep::Run {
            program,
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// The step as a shell line, quoting arguments that contain spaces
    pub fn command_line(&self) -> Option<String> {
        let SetupStep::Run { program, args } = self else {
            return None;
        };

        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            if arg.contains(char::is_whitespace) {
                line.push_str(&format!("\"{}\"", arg));
            } else {
                line.push_str(arg);
            }
        }
        Some(line)
    }
}

impl fmt::Display for SetupStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupStep::Run { program, args } if args.is_empty() => write!(f, "{}", program),
            SetupStep::Run { program, args } => write!(f, "{} {}", program, args.join(" ")),
            SetupStep::ClearScreen => write!(f, "clear"),
        }
    }
}

/// The ordered setup sequence for one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupPlan {
    pub steps: Vec<SetupStep>,
}

impl SetupPlan {
    /// `create_heroku_app` is false when the user chose to go on without the Heroku CLI
    pub fn for_record<C: ProductConfig>(
        record: &ConfigRecord,
        config: &C,
        create_heroku_app: bool,
    ) -> Self {
        let mut steps = vec![SetupStep::run("git", &["init"])];

        steps.push(if record.environment.yarn {
            SetupStep::run("yarn", &[])
        } else {
            SetupStep::run("npm", &["install"])
        });

        steps.push(SetupStep::run("git", &["add", "."]));
        steps.push(SetupStep::run(
            "git",
            &["commit", "-m", config.commit_message()],
        ));

        if record.heroku() && create_heroku_app {
            steps.push(SetupStep::run(
                "heroku",
                &["create", "--region", config.heroku_region()],
            ));
        }

        steps.push(SetupStep::ClearScreen);
        steps.push(SetupStep::run("npm", &["run", config.dev_script()]));

        Self { steps }
    }
}

/// Tracks which clear sequence the terminal gets next
#[derive(Debug)]
pub struct Display {
    first_clear: bool,
}

impl Default for Display {
    fn default() -> Self {
        Self { first_clear: true }
    }
}

impl Display {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the clear sequence: a full reset the first time, a screen clear after
    pub fn clear<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let sequence = if self.first_clear {
            FULL_RESET
        } else {
            CLEAR_SCREEN
        };
        self.first_clear = false;
        out.write_all(sequence.as_bytes())?;
        out.flush()
    }
}

/// Run every step of the plan in `dir`, stopping at the first failure
pub async fn run_setup(plan: &SetupPlan, dir: &Path, display: &mut Display) -> Result<(), SetupError> {
    for step in &plan.steps {
        match step {
            SetupStep::ClearScreen => display.clear(&mut console::Term::stdout())?,
            SetupStep::Run { program, args } => {
                println!("{} {}", "Running:".dimmed(), step.to_string().yellow());
                run_attached(program, args, dir).await?;
            }
        }
    }
    Ok(())
}

async fn run_attached(program: &str, args: &[String], dir: &Path) -> Result<(), SetupError> {
    let command = format!("{} {}", program, args.join(" ")).trim_end().to_string();

    let status = Command::new(program)
        .args(args)
        .current_dir(dir)
        .status()
        .await
        .map_err(|source| SetupError::Spawn {
            command: command.clone(),
            source,
        })?;

    if !status.success() {
        return Err(SetupError::Failed {
            command,
            code: status.code(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::record::{Environment, NodeConfig};
    use crate::resolver::tests::base;

    #[derive(Clone)]
    struct TestProduct;

    impl ProductConfig for TestProduct {
        fn name(&self) -> &'static str {
            "test"
        }
        fn display_name(&self) -> &'static str {
            "Test"
        }
        fn default_template_url(&self) -> &'static str {
            "https://example.com/templates"
        }
        fn template_url_env(&self) -> &'static str {
            "TEST_TEMPLATE_URL"
        }
        fn cli_description(&self) -> &'static str {
            "test"
        }
        fn upgrade_command(&self) -> &'static str {
            "upgrade"
        }
    }

    fn commands(plan: &SetupPlan) -> Vec<String> {
        plan.steps.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_npm_plan() {
        let plan = SetupPlan::for_record(&base(), &TestProduct, true);
        assert_eq!(
            commands(&plan),
            vec![
                "git init",
                "npm install",
                "git add .",
                "git commit -m :tada: initial commit",
                "clear",
                "npm run development",
            ]
        );
    }

    #[test]
    fn test_commit_message_is_one_argument() {
        let plan = SetupPlan::for_record(&base(), &TestProduct, true);
        assert_eq!(
            plan.steps[3],
            SetupStep::Run {
                program: "git",
                args: vec![
                    "commit".to_string(),
                    "-m".to_string(),
                    ":tada: initial commit".to_string()
                ],
            }
        );
    }

    #[test]
    fn test_yarn_and_heroku_plan() {
        let record = ConfigRecord {
            node: Some(NodeConfig {
                mongo: None,
                heroku: true,
            }),
            environment: Environment {
                yarn: true,
                ..Environment::default()
            },
            ..base()
        };

        let plan = SetupPlan::for_record(&record, &TestProduct, true);
        let cmds = commands(&plan);
        assert_eq!(cmds[1], "yarn");
        assert_eq!(cmds[4], "heroku create --region eu");
        assert_eq!(cmds.last().map(String::as_str), Some("npm run development"));

        let without_app = SetupPlan::for_record(&record, &TestProduct, false);
        assert!(!commands(&without_app).iter().any(|c| c.starts_with("heroku")));
    }

    #[test]
    fn test_command_line_quotes_spaced_arguments() {
        let plan = SetupPlan::for_record(&base(), &TestProduct, true);
        assert_eq!(
            plan.steps[3].command_line().as_deref(),
            Some("git commit -m \":tada: initial commit\"")
        );
        assert_eq!(plan.steps[2].command_line().as_deref(), Some("git add ."));
        assert_eq!(SetupStep::ClearScreen.command_line(), None);
    }

    #[test]
    fn test_next_steps_follow_the_plan() {
        let record = ConfigRecord {
            node: Some(NodeConfig {
                mongo: None,
                heroku: true,
            }),
            ..base()
        };
        let plan = SetupPlan::for_record(&record, &TestProduct, true);
        let expected: Vec<String> = plan.steps.iter().filter_map(SetupStep::command_line).collect();

        let steps = TestProduct.next_steps(Path::new("/nonexistent/site"), &record);
        assert_eq!(steps[0], "cd /nonexistent/site");
        assert_eq!(steps[1..], expected[..]);
        assert!(steps.contains(&"git add .".to_string()));
        assert!(steps.iter().any(|s| s.starts_with("git commit -m")));
        assert!(steps.contains(&"heroku create --region eu".to_string()));
        assert!(!steps.iter().any(|s| s == "clear"));
    }

    #[test]
    fn test_first_clear_resets_terminal() {
        let mut display = Display::new();
        let mut out = Vec::new();

        display.clear(&mut out).unwrap();
        assert_eq!(out, FULL_RESET.as_bytes());

        out.clear();
        display.clear(&mut out).unwrap();
        assert_eq!(out, CLEAR_SCREEN.as_bytes());
    }

    #[tokio::test]
    async fn test_failure_halts_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let plan = SetupPlan {
            steps: vec![
                SetupStep::run("sh", &["-c", "exit 3"]),
                SetupStep::run("sh", &["-c", "touch should-not-exist"]),
            ],
        };

        let err = run_setup(&plan, dir.path(), &mut Display::new())
            .await
            .unwrap_err();

        assert!(matches!(err, SetupError::Failed { code: Some(3), .. }));
        assert!(!dir.path().join("should-not-exist").exists());
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let plan = SetupPlan {
            steps: vec![SetupStep::run("webstack-definitely-not-installed", &[])],
        };

        let err = run_setup(&plan, dir.path(), &mut Display::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SetupError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_steps_run_in_project_directory() {
        let dir = tempfile::tempdir().unwrap();
        let plan = SetupPlan {
            steps: vec![SetupStep::run("sh", &["-c", "touch created-here"])],
        };

        run_setup(&plan, dir.path(), &mut Display::new()).await.unwrap();
        assert!(dir.path().join("created-here").exists());
    }
}
