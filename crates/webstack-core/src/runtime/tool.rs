//! Optional CLI tools that a project feature depends on
//!
//! Currently only the Heroku CLI, needed to create the remote app.

use anyhow::Result;
use colored::Colorize;
use std::time::Duration;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

/// Timeout for installation
const INSTALL_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for a CLI tool
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// Name of the tool binary (e.g., "heroku")
    pub name: &'static str,
    /// Display name for user-facing messages
    pub display_name: &'static str,
    /// URL to the install script
    pub install_script_url: &'static str,
    /// URL to the documentation
    pub docs_url: &'static str,
}

/// Manager for checking and installing a CLI tool
pub struct ToolManager {
    config: ToolConfig,
}

impl ToolManager {
    pub fn new(config: ToolConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    pub fn install_command(&self) -> String {
        format!("curl -fsSL {} | sh", self.config.install_script_url)
    }

    /// Check if the tool answers `--version`
    pub fn is_installed(&self) -> bool {
        self.get_version().is_some()
    }

    /// Get the installed tool version (first line of `--version`)
    pub fn get_version(&self) -> Option<String> {
        std::process::Command::new(self.config.name)
            .arg("--version")
            .output()
            .ok()
            .filter(|output| output.status.success())
            .and_then(|output| String::from_utf8(output.stdout).ok())
            .and_then(|s| s.lines().next().map(|l| l.trim().to_string()))
    }

    /// Install the tool using its official install script, attached to the terminal
    pub async fn install(&self) -> Result<()> {
        let cmd = self.install_command();
        println!();
        println!("{} {}", "Running:".dimmed(), cmd.yellow());
        println!();

        let mut child = TokioCommand::new("sh").arg("-c").arg(&cmd).spawn()?;

        let status = match timeout(INSTALL_TIMEOUT, child.wait()).await {
            Ok(status) => status?,
            Err(_) => {
                let _ = child.kill().await;
                anyhow::bail!(
                    "Installation timed out after {} seconds.\n\
                     Please try again later or install manually:\n\
                     {}",
                    INSTALL_TIMEOUT.as_secs(),
                    cmd
                );
            }
        };

        println!();
        if !status.success() {
            anyhow::bail!(
                "Installation failed with exit code: {}\n\
                 Please try installing manually: {}",
                status.code().unwrap_or(-1),
                cmd
            );
        }

        Ok(())
    }

    /// Open the tool's documentation in the default browser
    pub fn open_docs(&self) -> Result<()> {
        println!(
            "{}",
            format!("Opening {} documentation in your browser...", self.config.display_name).cyan()
        );
        open::that(self.config.docs_url)?;
        Ok(())
    }
}

/// Pre-configured tool manager for the Heroku CLI
pub fn heroku_tool(docs_url: &'static str) -> ToolManager {
    ToolManager::new(ToolConfig {
        name: "heroku",
        display_name: "Heroku CLI",
        install_script_url: "https://cli-assets.heroku.com/install.sh",
        docs_url,
    })
}
