//! Configuration collection and the finalized configuration record
//!
//! This module provides:
//! - The ordered question flow and the `Prompter` seam it asks through
//! - Raw `Answers` produced by the flow
//! - `ConfigRecord`, the validated record every later stage consumes

pub mod answers;
pub mod questions;
pub mod record;

pub use answers::{Answer, Answers};
pub use questions::{collect, parse_feature, DefaultsPrompter, Prompter, Question, QUESTIONS};
pub use record::{ConfigRecord, Environment, RecordError, Store, TemplateContext};
