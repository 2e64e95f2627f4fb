//! Template fetching, rendering, and materialization
//!
//! This module provides:
//! - Template manifest types (RootManifest, TemplateManifest)
//! - Template fetching from remote URLs or local directories
//! - Rendering with EJS-style delimiters
//! - Writing resolved files and directories into a project
//! - Version compatibility checking

pub mod fetcher;
pub mod manifest;
pub mod materialize;
pub mod render;
pub mod version;

use crate::product::ProductConfig;
use crate::resolver;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

pub use fetcher::{TemplateFetcher, TemplateSource};
pub use manifest::{RootManifest, TemplateManifest};
pub use materialize::{materialize, MaterializeReport};
pub use render::{RenderError, TemplateRenderer};
pub use version::check_compatibility;

/// Template paths the resolver can ask for that `template_name` does not ship
pub async fn missing_sources(
    template_dir: &Path,
    template_name: &str,
) -> Result<Vec<&'static str>> {
    let mut fetcher = TemplateFetcher::from_local(template_dir.to_path_buf(), "webstack-build");
    let shipped = fetcher.list_files(template_name).await?;

    Ok(resolver::all_template_sources()
        .into_iter()
        .filter(|source| !shipped.iter().any(|f| f == source))
        .collect())
}

/// Pack one template after checking it covers every resolvable file
pub async fn pack_template(template_dir: &Path, template_name: &str) -> Result<Vec<u8>> {
    let missing = missing_sources(template_dir, template_name).await?;
    if !missing.is_empty() {
        anyhow::bail!(
            "template '{}' is missing {} file(s): {}",
            template_name,
            missing.len(),
            missing.join(", ")
        );
    }

    TemplateFetcher::build_local_zip(template_dir, template_name)
}

/// Build `<name>.zip` for every template listed in the root manifest
///
/// A template that lacks a file some configuration would render is not
/// packed; the command fails once all templates were tried.
pub async fn build_zips<C: ProductConfig>(
    config: &C,
    template_dir: &Option<PathBuf>,
) -> Result<()> {
    let dir = template_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("templates"));

    let root_manifest = TemplateFetcher::from_local(dir.clone(), config.user_agent())
        .fetch_root_manifest()
        .await
        .with_context(|| format!("No template set found in {}", dir.display()))?;

    println!(
        "{} {}",
        "Packing".cyan().bold(),
        format!("{} templates from {}", config.display_name(), dir.display()).cyan()
    );

    let mut failed = Vec::new();
    for template_name in &root_manifest.templates {
        match pack_template(&dir, template_name).await {
            Ok(zip_bytes) => {
                let zip_path = dir.join(format!("{}.zip", template_name));
                std::fs::write(&zip_path, &zip_bytes)
                    .with_context(|| format!("Failed to write {}", zip_path.display()))?;
                println!(
                    "  {} {} ({} bytes)",
                    "packed".green(),
                    zip_path.display(),
                    zip_bytes.len()
                );
            }
            Err(e) => {
                println!("  {} {}: {:#}", "skipped".red(), template_name, e);
                failed.push(template_name.as_str());
            }
        }
    }

    if !failed.is_empty() {
        anyhow::bail!("Could not pack: {}", failed.join(", "));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundled_templates() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates")
    }

    #[tokio::test]
    async fn test_bundled_template_ships_every_source() {
        let missing = missing_sources(&bundled_templates(), "webstack").await.unwrap();
        assert!(missing.is_empty(), "missing: {:?}", missing);

        let zip = pack_template(&bundled_templates(), "webstack").await.unwrap();
        assert!(!zip.is_empty());
    }

    #[tokio::test]
    async fn test_incomplete_template_is_not_packed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("template.yaml"), "templates: [partial]\n").unwrap();
        let partial = dir.path().join("partial");
        std::fs::create_dir_all(partial.join("src/css")).unwrap();
        std::fs::write(
            partial.join("template.yaml"),
            "name: Partial\ndescription: css only\nversion: 0.1.0\n",
        )
        .unwrap();
        std::fs::write(partial.join("src/css/reset.css"), "* {}\n").unwrap();

        let missing = missing_sources(dir.path(), "partial").await.unwrap();
        assert!(!missing.contains(&"src/css/reset.css"));
        assert!(missing.contains(&"_package.json"));
        assert!(missing.contains(&"server/schemas/User.js"));

        let err = pack_template(dir.path(), "partial").await.unwrap_err();
        assert!(err.to_string().contains("_package.json"));
    }
}
