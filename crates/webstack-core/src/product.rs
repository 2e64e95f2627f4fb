//! Product configuration trait for CLI binaries
//!
//! The binary implements this trait to supply everything product-specific:
//! names, template location, and the constants baked into the setup commands.

use crate::config::ConfigRecord;
use crate::runtime::setup::{SetupPlan, SetupStep};
use std::path::{Path, PathBuf};

/// Configuration trait for the scaffolding CLI
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Default URL for fetching templates
    fn default_template_url(&self) -> &'static str;

    /// Environment variable name for overriding template URL
    fn template_url_env(&self) -> &'static str;

    /// Template set shipped alongside the binary, used when no URL override is set
    fn bundled_templates(&self) -> Option<PathBuf> {
        None
    }

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// Upgrade/install command shown in version warnings
    fn upgrade_command(&self) -> &'static str;

    /// Message of the first commit in a generated project
    fn commit_message(&self) -> &'static str {
        ":tada: initial commit"
    }

    /// Region passed to `heroku create`
    fn heroku_region(&self) -> &'static str {
        "eu"
    }

    /// Script started once setup is done
    fn dev_script(&self) -> &'static str {
        "development"
    }

    /// Where to send users who need the Heroku CLI
    fn heroku_docs_url(&self) -> &'static str {
        "https://devcenter.heroku.com/articles/heroku-cli"
    }

    /// Generate the "next steps" instructions when setup commands are skipped
    ///
    /// Mirrors the setup plan so both paths leave the project in the same state.
    fn next_steps(&self, dir: &Path, record: &ConfigRecord) -> Vec<String> {
        let mut steps = Vec::new();

        if std::env::current_dir().ok().as_deref() != Some(dir) {
            steps.push(format!("cd {}", dir.display()));
        }

        let plan = SetupPlan::for_record(record, self, true);
        steps.extend(plan.steps.iter().filter_map(SetupStep::command_line));
        steps
    }

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}
