//! Webstack Core - library behind the `webstack` scaffolding CLI
//!
//! Generates a web project (optionally React, Redux or MobX, a Hapi server,
//! MongoDB, JWT auth, Jest, Flow, Heroku deployment) from a template set,
//! then runs the setup commands inside it.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - the question flow, the configuration record,
//!   the pure option resolver, template fetching/rendering, runtime detection
//! - **Layer 2: Workflow Orchestration** - `ProductConfig` trait, materialization
//!   and the setup command runner
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use webstack_core::config::{collect, ConfigRecord, DefaultsPrompter, Answers};
//! use webstack_core::{resolver, runtime};
//!
//! let answers = collect(&mut DefaultsPrompter, &Answers::new(), "my-site")?;
//! let (environment, _) = runtime::detect_environment();
//! let record = ConfigRecord::from_answers(&answers, environment)?;
//! let resolution = resolver::resolve(&record);
//! ```

pub mod config;
pub mod product;
pub mod resolver;
pub mod runtime;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{ConfigRecord, RecordError};
pub use product::ProductConfig;
pub use resolver::{resolve, DirectoryEntry, FileOperation, Resolution};
pub use templates::{materialize, RootManifest, TemplateFetcher, TemplateManifest, TemplateSource};

#[cfg(feature = "tui")]
pub use tui::run;
