//! Writing a resolved project to disk

use crate::config::ConfigRecord;
use crate::resolver::{DirectoryEntry, FileOperation, Resolution};
use crate::templates::fetcher::TemplateFetcher;
use crate::templates::manifest::TemplateManifest;
use crate::templates::render::TemplateRenderer;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// What was written
#[derive(Debug, Default)]
pub struct MaterializeReport {
    pub files: Vec<FileOperation>,
    pub directories: Vec<DirectoryEntry>,
    /// Directories that could not be created, with the error
    pub skipped_directories: Vec<(DirectoryEntry, String)>,
}

/// Create the resolved directories and render the resolved files into `target_dir`
///
/// A directory that cannot be created is recorded in the report and skipped.
/// Any file failure aborts the run; files already written stay in place.
pub async fn materialize(
    fetcher: &mut TemplateFetcher,
    template_name: &str,
    manifest: &TemplateManifest,
    resolution: &Resolution,
    record: &ConfigRecord,
    target_dir: &Path,
) -> Result<MaterializeReport> {
    fs::create_dir_all(target_dir)
        .await
        .with_context(|| format!("Failed to create project directory {}", target_dir.display()))?;

    let mut report = MaterializeReport::default();

    for dir in &resolution.directories {
        match fs::create_dir_all(target_dir.join(dir.path())).await {
            Ok(()) => report.directories.push(*dir),
            Err(e) => report.skipped_directories.push((*dir, e.to_string())),
        }
    }

    let renderer = TemplateRenderer::new(&record.template_context())?;

    for op in &resolution.files {
        let content = if manifest.is_raw(op.from) {
            fetcher.fetch_file_bytes(template_name, op.from).await?
        } else {
            let source = fetcher.fetch_file(template_name, op.from).await?;
            renderer.render(op.from, &source)?.into_bytes()
        };

        write_file(&target_dir.join(op.to), &content).await?;
        report.files.push(*op);
    }

    Ok(report)
}

async fn write_file(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(target_path, content)
        .await
        .with_context(|| format!("Failed to write file: {}", target_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::record::{NodeConfig, ReactConfig, Store};
    use crate::resolver::{self, tests::base};
    use std::path::PathBuf;

    fn bundled_templates() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates")
    }

    #[tokio::test]
    async fn test_materialize_minimal_project() {
        let out = tempfile::tempdir().unwrap();
        let mut fetcher = TemplateFetcher::from_local(bundled_templates(), "webstack-test");
        let manifest = fetcher.fetch_template_manifest("webstack").await.unwrap();

        let record = base();
        let resolution = resolver::resolve(&record);
        let report = materialize(
            &mut fetcher,
            "webstack",
            &manifest,
            &resolution,
            &record,
            out.path(),
        )
        .await
        .unwrap();

        assert_eq!(report.files.len(), resolution.files.len());
        assert!(report.skipped_directories.is_empty());
        assert!(out.path().join(".gitignore").is_file());
        assert!(!out.path().join("_gitignore").exists());
        assert!(out.path().join("dist").is_dir());
        assert!(out.path().join("src/assets/fonts").is_dir());

        let package = std::fs::read_to_string(out.path().join("package.json")).unwrap();
        assert!(package.contains("\"name\": \"site\""));
        assert!(!package.contains("<%"));
    }

    #[tokio::test]
    async fn test_materialize_is_repeatable_over_existing_project() {
        let out = tempfile::tempdir().unwrap();
        let mut fetcher = TemplateFetcher::from_local(bundled_templates(), "webstack-test");
        let manifest = fetcher.fetch_template_manifest("webstack").await.unwrap();

        let record = ConfigRecord {
            react: Some(ReactConfig {
                router: true,
                store: Store::Mobx,
            }),
            node: Some(NodeConfig::default()),
            ..base()
        };
        let resolution = resolver::resolve(&record);

        for _ in 0..2 {
            let report = materialize(
                &mut fetcher,
                "webstack",
                &manifest,
                &resolution,
                &record,
                out.path(),
            )
            .await
            .unwrap();
            assert_eq!(report.directories.len(), resolution.directories.len());
        }

        assert!(out.path().join("src/js/stores/store.js").is_file());
        assert!(out.path().join("server/routes/static/spa.js").is_file());
        assert!(!out.path().join("server/routes/static/public.js").exists());
    }

    #[tokio::test]
    async fn test_blocked_directory_is_skipped_not_fatal() {
        let out = tempfile::tempdir().unwrap();
        // a file where a directory should go
        std::fs::create_dir_all(out.path().join("src/assets")).unwrap();
        std::fs::write(out.path().join("src/assets/img"), "not a dir").unwrap();

        let mut fetcher = TemplateFetcher::from_local(bundled_templates(), "webstack-test");
        let manifest = fetcher.fetch_template_manifest("webstack").await.unwrap();
        let record = base();
        let resolution = resolver::resolve(&record);

        let report = materialize(
            &mut fetcher,
            "webstack",
            &manifest,
            &resolution,
            &record,
            out.path(),
        )
        .await
        .unwrap();

        assert_eq!(report.skipped_directories.len(), 1);
        assert_eq!(report.skipped_directories[0].0.path(), "src/assets/img");
        assert_eq!(report.files.len(), resolution.files.len());
    }

    #[tokio::test]
    async fn test_missing_template_file_is_fatal() {
        let templates = tempfile::tempdir().unwrap();
        std::fs::write(templates.path().join("template.yaml"), "templates: [empty]\n").unwrap();
        std::fs::create_dir_all(templates.path().join("empty")).unwrap();
        std::fs::write(
            templates.path().join("empty/template.yaml"),
            "name: Empty\ndescription: nothing\nversion: 0.1.0\n",
        )
        .unwrap();

        let out = tempfile::tempdir().unwrap();
        let mut fetcher =
            TemplateFetcher::from_local(templates.path().to_path_buf(), "webstack-test");
        let manifest = fetcher.fetch_template_manifest("empty").await.unwrap();
        let record = base();

        let result = materialize(
            &mut fetcher,
            "empty",
            &manifest,
            &resolver::resolve(&record),
            &record,
            out.path(),
        )
        .await;

        let err = result.unwrap_err();
        assert!(err.to_string().contains("src/css/reset.css"));
    }

    /// Every template any record can reference exists and renders for every record
    #[tokio::test]
    async fn test_bundled_template_renders_for_every_record() {
        let mut fetcher = TemplateFetcher::from_local(bundled_templates(), "webstack-test");
        let manifest = fetcher.fetch_template_manifest("webstack").await.unwrap();

        for record in resolver::tests::all_records() {
            let renderer = TemplateRenderer::new(&record.template_context()).unwrap();
            for op in resolver::resolve(&record).files {
                if manifest.is_raw(op.from) {
                    continue;
                }
                let source = fetcher.fetch_file("webstack", op.from).await.unwrap();
                let rendered = renderer.render(op.from, &source).unwrap();
                assert!(!rendered.contains("<%"), "unrendered tag in {}", op.from);
            }
        }
    }
}
