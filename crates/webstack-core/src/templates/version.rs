//! Version handling for template compatibility and detected runtimes

use anyhow::Result;
use semver::Version;

/// Compare the CLI version against the version a template was written for.
/// Returns a warning message if the CLI is older than the template expects.
pub fn check_compatibility(
    cli_version: &str,
    template_version: &str,
    upgrade_command: &str,
) -> Option<String> {
    // Unparseable versions can't be compared; no warning
    let cli_ver = parse_version(cli_version).ok()?;
    let template_ver = parse_version(template_version).ok()?;

    if cli_ver < template_ver {
        Some(format!(
            "This template was designed for CLI version {} or newer.\n\
             You are running version {}.\n\
             Consider updating: {}",
            template_ver, cli_ver, upgrade_command
        ))
    } else {
        None
    }
}

/// Parse a version string, accepting a leading `v` (as printed by `node --version`)
pub fn parse_version(version_str: &str) -> Result<Version> {
    let trimmed = version_str.trim();
    let cleaned = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(cleaned).map_err(|e| anyhow::anyhow!("Invalid version '{}': {}", version_str, e))
}
