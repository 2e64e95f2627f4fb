//! Template rendering
//!
//! Generated projects are full of JSX and template literals, so templates use
//! EJS-style delimiters instead of the Jinja defaults:
//!
//! - `<%= name %>` interpolates a value
//! - `<% if jwt %> ... <% endif %>` wraps conditional blocks
//! - `<%# ... %>` is a comment

use crate::config::TemplateContext;
use minijinja::syntax::SyntaxConfig;
use minijinja::{Environment, UndefinedBehavior, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to configure template syntax: {0}")]
    Syntax(#[source] minijinja::Error),

    #[error("failed to load template {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("failed to render template {path}: {source}")]
    Render {
        path: String,
        #[source]
        source: minijinja::Error,
    },
}

/// Renders template files against one project's context
pub struct TemplateRenderer {
    context: Value,
    syntax: SyntaxConfig,
}

impl TemplateRenderer {
    pub fn new(context: &TemplateContext) -> Result<Self, RenderError> {
        let syntax = SyntaxConfig::builder()
            .block_delimiters("<%", "%>")
            .variable_delimiters("<%=", "%>")
            .comment_delimiters("<%#", "%>")
            .build()
            .map_err(RenderError::Syntax)?;

        Ok(Self {
            context: Value::from_serialize(context),
            syntax,
        })
    }

    /// Render one template's source; `path` is used for error messages
    pub fn render(&self, path: &str, source: &str) -> Result<String, RenderError> {
        let mut env = Environment::new();
        env.set_syntax(self.syntax.clone());
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        // block tags on their own line leave no blank line behind
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);

        let template = env
            .template_from_named_str(path, source)
            .map_err(|source| RenderError::Load {
                path: path.to_string(),
                source,
            })?;

        template
            .render(&self.context)
            .map_err(|source| RenderError::Render {
                path: path.to_string(),
                source,
            })
    }
}
