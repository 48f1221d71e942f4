//! # Storage Layer
//!
//! Loads the planner's inputs from files. Nothing here is needed to plan:
//! the pipeline takes a [`Catalog`](crate::domain::Catalog),
//! [`DegreeRequirements`](crate::domain::DegreeRequirements) and
//! [`PlannerSettings`](crate::planner::PlannerSettings) built any way the
//! caller likes.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Catalog | JSON (flat or `{"courses": ...}`) | `.planner/catalog.json` |
//! | Offering overrides | JSON (`code → terms`) | `.planner/offerings.json` |
//! | Programs and minors | YAML or JSON | `.planner/programs.yaml` |
//! | Config | TOML | `.planner/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - [`CatalogStore`] reads under a shared file lock (`fs2`)
//!
//! ## Key Types
//!
//! - [`Project`] - Entry point for a planner data directory
//! - [`CatalogStore`] - Reads the course catalog
//! - [`ProgramStore`] - Reads program requirements
//! - [`Config`] - Project and global configuration

mod catalog;
mod config;
mod programs;
mod project;

pub use catalog::{parse_catalog, parse_offerings, CatalogEntry, CatalogError, CatalogStore};
pub use config::{
    CalendarConfig, Config, ConfigError, GlobalConfig, ProgramConfig, ProjectConfig,
    ResolverConfig,
};
pub use programs::{MinorSummary, ProgramError, ProgramIndex, ProgramStore, ProgramSummary};
pub use project::{Project, ProjectError};
