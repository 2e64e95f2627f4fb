//! Runtime detection, optional tools, and post-generation setup
//!
//! This module provides:
//! - Detection of node, yarn, npm, git and the Heroku CLI
//! - Installation of the Heroku CLI
//! - The setup command sequence run inside a generated project

pub mod check;
pub mod setup;
pub mod tool;

pub use check::{check_setup_tools, detect_environment, RuntimeInfo};
pub use setup::{run_setup, Display, SetupError, SetupPlan, SetupStep};
pub use tool::{heroku_tool, ToolManager};
