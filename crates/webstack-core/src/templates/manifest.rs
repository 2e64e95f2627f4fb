//! Template manifest types and parsing

use serde::{Deserialize, Serialize};

/// Root template manifest (templates/template.yaml)
/// Lists available template directories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootManifest {
    /// List of template directory names
    pub templates: Vec<String>,

    /// Template used when none is requested
    #[serde(default)]
    pub default: Option<String>,
}

impl RootManifest {
    /// The template to use when the user did not name one
    pub fn default_template(&self) -> Option<&str> {
        self.default
            .as_deref()
            .or_else(|| self.templates.first().map(String::as_str))
    }

    pub fn contains(&self, template_name: &str) -> bool {
        self.templates.iter().any(|t| t == template_name)
    }
}

/// Per-template manifest (templates/<name>/template.yaml)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateManifest {
    /// Display name of the template
    pub name: String,

    /// Description of what the template provides
    pub description: String,

    /// Semver version for CLI compatibility checking
    pub version: String,

    /// Files that are copied verbatim instead of rendered (e.g. binary assets)
    #[serde(default)]
    pub raw: Vec<String>,
}

impl TemplateManifest {
    /// Whether a template file is copied without rendering
    pub fn is_raw(&self, file_path: &str) -> bool {
        self.raw.iter().any(|pattern| {
            if let Some(suffix) = pattern.strip_prefix('*') {
                file_path.ends_with(suffix)
            } else {
                file_path == pattern
            }
        })
    }
}
