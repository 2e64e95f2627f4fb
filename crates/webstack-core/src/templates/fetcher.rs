//! Template fetching from remote (GitHub) or local directory
//!
//! Both remote and local templates use zip files for consistency:
//! - Remote: Fetches pre-built zips from URL
//! - Local: Builds zips from template folders on the fly, then uses them
//!
//! This ensures identical behavior between development and production.

use super::manifest::{RootManifest, TemplateManifest};
use crate::product::ProductConfig;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use tokio::fs;
use url::Url;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

const MANIFEST_FILE: &str = "template.yaml";

/// Template source - either remote URL or local directory
#[derive(Debug, Clone)]
pub enum TemplateSource {
    Remote(Url),
    Local(PathBuf),
}

impl TemplateSource {
    /// Pick the template source for a product config
    ///
    /// The URL environment variable wins; otherwise a bundled template set
    /// on disk is used, and the product's default URL only as a last resort.
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        Self::select(
            std::env::var(config.template_url_env()).ok(),
            config.bundled_templates(),
            config.default_template_url(),
        )
    }

    fn select(
        url_override: Option<String>,
        bundled: Option<PathBuf>,
        default_url: &str,
    ) -> Result<Self> {
        if let Some(url_str) = url_override.filter(|u| !u.trim().is_empty()) {
            return Self::remote(&url_str);
        }

        match bundled.filter(|dir| dir.join(MANIFEST_FILE).is_file()) {
            Some(dir) => Ok(Self::Local(dir)),
            None => Self::remote(default_url),
        }
    }

    fn remote(url_str: &str) -> Result<Self> {
        let url =
            Url::parse(url_str).with_context(|| format!("Invalid template URL: {}", url_str))?;
        Ok(Self::Remote(url))
    }

    /// Create a local template source from a path
    pub fn local(path: PathBuf) -> Self {
        Self::Local(path)
    }
}

/// Cached template data extracted from zip
#[derive(Debug, Clone)]
struct TemplateCache {
    manifest: TemplateManifest,
    files: HashMap<String, Vec<u8>>,
}

/// Template fetcher - handles retrieving templates from remote or local sources
pub struct TemplateFetcher {
    source: TemplateSource,
    client: reqwest::Client,
    /// Cache of downloaded/built and extracted templates
    template_cache: HashMap<String, TemplateCache>,
}

impl TemplateFetcher {
    /// Create a new fetcher with a custom user agent
    pub fn new(source: TemplateSource, user_agent: &str) -> Self {
        Self {
            source,
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            template_cache: HashMap::new(),
        }
    }

    /// Create a fetcher from a product config
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        let source = TemplateSource::from_config(config)?;
        Ok(Self::new(source, config.user_agent()))
    }

    /// Create a fetcher for local templates
    pub fn from_local(path: PathBuf, user_agent: &str) -> Self {
        Self::new(TemplateSource::local(path), user_agent)
    }

    /// Build a URL by appending a path segment, preserving query parameters
    fn build_url(base: &Url, path_segment: &str) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("URL cannot have path segments: {}", base))?
            .pop_if_empty()
            .push(path_segment);
        Ok(url)
    }

    async fn fetch_remote(&self, url: Url, what: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch {} from {}", what, url))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Failed to fetch {} from {}: HTTP {}",
                what,
                url,
                response.status()
            );
        }

        Ok(response)
    }

    /// Fetch the root manifest listing available templates
    pub async fn fetch_root_manifest(&self) -> Result<RootManifest> {
        match &self.source {
            TemplateSource::Remote(base_url) => {
                let url = Self::build_url(base_url, MANIFEST_FILE)?;
                let content = self
                    .fetch_remote(url, "root template manifest")
                    .await?
                    .text()
                    .await?;
                serde_yaml::from_str(&content).context("Failed to parse root manifest")
            }
            TemplateSource::Local(path) => {
                let manifest_path = path.join(MANIFEST_FILE);
                let content = fs::read_to_string(&manifest_path)
                    .await
                    .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
                serde_yaml::from_str(&content).context("Failed to parse root manifest")
            }
        }
    }

    /// Build a zip file for a local template
    ///
    /// Every file under the template directory is included, with
    /// `template.yaml` first. Entries are prefixed with the template name.
    pub fn build_local_zip(template_dir: &Path, template_name: &str) -> Result<Vec<u8>> {
        let template_path = template_dir.join(template_name);
        let manifest_path = template_path.join(MANIFEST_FILE);

        // Validate the manifest before packing anything
        let manifest_content = std::fs::read_to_string(&manifest_path)
            .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
        let _: TemplateManifest = serde_yaml::from_str(&manifest_content)
            .with_context(|| format!("Failed to parse template '{}' manifest", template_name))?;

        let mut zip_buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut zip_buffer));
            let options =
                SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

            zip.start_file(format!("{}/{}", template_name, MANIFEST_FILE), options)?;
            zip.write_all(manifest_content.as_bytes())?;

            for entry in WalkDir::new(&template_path).sort_by_file_name() {
                let entry = entry.with_context(|| {
                    format!("Failed to walk template directory {}", template_path.display())
                })?;
                if !entry.file_type().is_file() {
                    continue;
                }

                let relative = relative_zip_path(&template_path, entry.path())?;
                if relative == MANIFEST_FILE {
                    continue;
                }

                let content = std::fs::read(entry.path())
                    .with_context(|| format!("Failed to read {}", entry.path().display()))?;
                zip.start_file(format!("{}/{}", template_name, relative), options)?;
                zip.write_all(&content)?;
            }

            zip.finish()?;
        }

        Ok(zip_buffer)
    }

    /// Extract a zip into the template cache
    fn extract_zip_to_cache(zip_bytes: &[u8], template_name: &str) -> Result<TemplateCache> {
        let cursor = Cursor::new(zip_bytes);
        let mut archive = ZipArchive::new(cursor).with_context(|| {
            format!(
                "Failed to read zip archive for template '{}'",
                template_name
            )
        })?;

        let mut files: HashMap<String, Vec<u8>> = HashMap::new();
        let mut manifest: Option<TemplateManifest> = None;

        // Entries look like {template_name}/file.txt
        let prefix = format!("{}/", template_name);

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }

            let full_path = file.name().to_string();
            let relative_path = full_path
                .strip_prefix(&prefix)
                .unwrap_or(&full_path)
                .to_string();

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;

            if relative_path == MANIFEST_FILE {
                let content_str = String::from_utf8_lossy(&contents);
                manifest = Some(serde_yaml::from_str(&content_str).with_context(|| {
                    format!("Failed to parse template '{}' manifest", template_name)
                })?);
            }

            files.insert(relative_path, contents);
        }

        let manifest = manifest.ok_or_else(|| {
            anyhow::anyhow!("Template '{}' zip missing template.yaml", template_name)
        })?;

        Ok(TemplateCache { manifest, files })
    }

    /// Fetch/build and cache a template's zip file
    async fn fetch_and_cache_template(&mut self, template_name: &str) -> Result<()> {
        if self.template_cache.contains_key(template_name) {
            return Ok(());
        }

        let zip_bytes = match &self.source {
            TemplateSource::Remote(base_url) => {
                let zip_url = Self::build_url(base_url, &format!("{}.zip", template_name))?;
                self.fetch_remote(zip_url, &format!("template '{}' zip", template_name))
                    .await?
                    .bytes()
                    .await?
                    .to_vec()
            }
            TemplateSource::Local(path) => Self::build_local_zip(path, template_name)?,
        };

        let cache = Self::extract_zip_to_cache(&zip_bytes, template_name)?;
        self.template_cache.insert(template_name.to_string(), cache);

        Ok(())
    }

    fn cached(&self, template_name: &str) -> Result<&TemplateCache> {
        self.template_cache
            .get(template_name)
            .ok_or_else(|| anyhow::anyhow!("Template '{}' not found in cache", template_name))
    }

    /// Fetch a specific template's manifest
    pub async fn fetch_template_manifest(
        &mut self,
        template_name: &str,
    ) -> Result<TemplateManifest> {
        self.fetch_and_cache_template(template_name).await?;
        Ok(self.cached(template_name)?.manifest.clone())
    }

    /// Fetch a file as bytes
    pub async fn fetch_file_bytes(
        &mut self,
        template_name: &str,
        file_path: &str,
    ) -> Result<Vec<u8>> {
        self.fetch_and_cache_template(template_name).await?;
        self.cached(template_name)?
            .files
            .get(file_path)
            .cloned()
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "File '{}' not found in template '{}'",
                    file_path,
                    template_name
                )
            })
    }

    /// Fetch a file as text (for rendering)
    pub async fn fetch_file(&mut self, template_name: &str, file_path: &str) -> Result<String> {
        let bytes = self.fetch_file_bytes(template_name, file_path).await?;
        String::from_utf8(bytes)
            .with_context(|| format!("Template file '{}' is not valid UTF-8", file_path))
    }

    /// Paths of every file in a template, sorted
    pub async fn list_files(&mut self, template_name: &str) -> Result<Vec<String>> {
        self.fetch_and_cache_template(template_name).await?;
        let mut files: Vec<String> = self.cached(template_name)?.files.keys().cloned().collect();
        files.sort();
        Ok(files)
    }

    /// Get the template source
    pub fn source(&self) -> &TemplateSource {
        &self.source
    }
}

/// Zip entry path of `path` relative to `root`, always with `/` separators
fn relative_zip_path(root: &Path, path: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(root)
        .with_context(|| format!("{} is outside {}", path.display(), root.display()))?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_template(root: &Path) {
        std::fs::write(root.join("template.yaml"), "templates:\n  - demo\n").unwrap();
        let demo = root.join("demo");
        std::fs::create_dir_all(demo.join("src/css")).unwrap();
        std::fs::write(
            demo.join("template.yaml"),
            "name: Demo\ndescription: Demo template\nversion: 0.1.0\n",
        )
        .unwrap();
        std::fs::write(demo.join("src/css/style.css"), "body {}\n").unwrap();
        std::fs::write(demo.join("_gitignore"), "node_modules\n").unwrap();
    }

    #[test]
    fn test_build_url_appends_segment() {
        let base = Url::parse("https://example.com/templates/?ref=main").unwrap();
        let url = TemplateFetcher::build_url(&base, "template.yaml").unwrap();
        assert_eq!(url.as_str(), "https://example.com/templates/template.yaml?ref=main");
    }

    #[test]
    fn test_local_zip_round_trips_through_cache() {
        let dir = tempfile::tempdir().unwrap();
        write_template(dir.path());

        let zip = TemplateFetcher::build_local_zip(dir.path(), "demo").unwrap();
        let cache = TemplateFetcher::extract_zip_to_cache(&zip, "demo").unwrap();

        assert_eq!(cache.manifest.name, "Demo");
        assert_eq!(cache.files.get("src/css/style.css").unwrap(), b"body {}\n");
        assert!(cache.files.contains_key("_gitignore"));
    }

    #[test]
    fn test_local_zip_requires_manifest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("broken")).unwrap();
        assert!(TemplateFetcher::build_local_zip(dir.path(), "broken").is_err());
    }

    #[test]
    fn test_source_prefers_url_override() {
        let dir = tempfile::tempdir().unwrap();
        write_template(dir.path());

        let source = TemplateSource::select(
            Some("https://mirror.example.com/templates".to_string()),
            Some(dir.path().to_path_buf()),
            "https://example.com/templates",
        )
        .unwrap();
        assert!(
            matches!(source, TemplateSource::Remote(url) if url.host_str() == Some("mirror.example.com"))
        );
    }

    #[test]
    fn test_source_falls_back_to_bundled_templates() {
        let dir = tempfile::tempdir().unwrap();
        write_template(dir.path());

        let source = TemplateSource::select(
            None,
            Some(dir.path().to_path_buf()),
            "https://example.com/templates",
        )
        .unwrap();
        assert!(matches!(source, TemplateSource::Local(path) if path == dir.path()));

        // a bundled directory without a root manifest is not a template set
        let empty = tempfile::tempdir().unwrap();
        let source = TemplateSource::select(
            Some(String::new()),
            Some(empty.path().to_path_buf()),
            "https://example.com/templates",
        )
        .unwrap();
        assert!(matches!(source, TemplateSource::Remote(_)));

        assert!(TemplateSource::select(None, None, "not a url").is_err());
    }

    #[tokio::test]
    async fn test_local_fetcher_serves_files() {
        let dir = tempfile::tempdir().unwrap();
        write_template(dir.path());

        let mut fetcher = TemplateFetcher::from_local(dir.path().to_path_buf(), "webstack-test");
        let root = fetcher.fetch_root_manifest().await.unwrap();
        assert_eq!(root.templates, vec!["demo".to_string()]);

        let manifest = fetcher.fetch_template_manifest("demo").await.unwrap();
        assert_eq!(manifest.version, "0.1.0");

        let css = fetcher.fetch_file("demo", "src/css/style.css").await.unwrap();
        assert_eq!(css, "body {}\n");

        let files = fetcher.list_files("demo").await.unwrap();
        assert_eq!(files, vec!["_gitignore", "src/css/style.css", "template.yaml"]);

        assert!(fetcher.fetch_file("demo", "missing.js").await.is_err());
    }
}
