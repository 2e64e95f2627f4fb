//! Detection of the tools a generated project relies on

use crate::config::{ConfigRecord, Environment};
use crate::templates::version::parse_version;
use anyhow::Result;
use std::process::Command;

/// Tool detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

impl RuntimeInfo {
    /// "Name (version)" or "Name (not installed)"
    pub fn describe(&self) -> String {
        if self.available {
            format!("{} ({})", self.name, self.version.as_deref().unwrap_or("unknown"))
        } else {
            format!("{} (not installed)", self.name)
        }
    }
}

/// Run `<program> --version` and report what came back
fn probe(name: &'static str, program: &str) -> RuntimeInfo {
    match Command::new(program).arg("--version").output() {
        Ok(out) if out.status.success() => {
            let stdout = String::from_utf8_lossy(&out.stdout);
            let version = stdout.lines().next().unwrap_or_default().trim().to_string();
            RuntimeInfo {
                name,
                version: Some(version),
                available: true,
            }
        }
        _ => RuntimeInfo {
            name,
            version: None,
            available: false,
        },
    }
}

/// Check if Node.js is available
pub fn check_node() -> RuntimeInfo {
    probe("Node.js", "node")
}

/// Check if yarn is available
pub fn check_yarn() -> RuntimeInfo {
    probe("Yarn", "yarn")
}

/// Check if npm is available
pub fn check_npm() -> RuntimeInfo {
    probe("npm", "npm")
}

/// Check if git is available
pub fn check_git() -> RuntimeInfo {
    probe("Git", "git")
}

/// Node version for templates: `v20.11.1` becomes `20.11.1`, `*` when unknown
pub fn node_version_from(info: &RuntimeInfo) -> String {
    info.version
        .as_deref()
        .and_then(|v| parse_version(v).ok())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "*".to_string())
}

/// Random token for generated server config
pub fn generate_secret() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Detect the values of the record that are not asked
///
/// yarn is preferred whenever its version check succeeds.
pub fn detect_environment() -> (Environment, Vec<RuntimeInfo>) {
    let node = check_node();
    let yarn = check_yarn();

    let environment = Environment {
        yarn: yarn.available,
        node_version: node_version_from(&node),
        secret: generate_secret(),
    };

    (environment, vec![node, yarn])
}

/// Verify the tools the setup commands need; fails listing everything missing
pub fn check_setup_tools(record: &ConfigRecord) -> Result<Vec<RuntimeInfo>> {
    let mut required = vec![check_git()];
    required.push(if record.environment.yarn {
        check_yarn()
    } else {
        check_npm()
    });

    let missing: Vec<&RuntimeInfo> = required.iter().filter(|r| !r.available).collect();
    if !missing.is_empty() {
        anyhow::bail!(
            "Missing required tools:\n{}",
            missing
                .iter()
                .map(|r| format!("  - {}", r.name))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    Ok(required)
}
