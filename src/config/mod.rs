//! Configuration module for semview.
//!
//! Handles tool settings and project files describing datasets.

mod project;
mod settings;

pub use project::{DatasetKind, Project, ProjectError, ProjectResult};
pub use settings::{
    expand_env_vars, CompositionSettings, PreviewSettings, Settings, SettingsError,
};
