//! Configuration handling
//!
//! Configuration is stored in `.planner/config.toml` (project) and
//! `~/.config/degree-planner/config.toml` (global).

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Calendar;
use crate::planner::{
    default_career_tracks, default_pathway_departments, default_stem_departments, CareerTrack,
    LimitDefaults, PlanRequest, PlannerSettings, Strategy,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Which program the project plans for
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ProgramConfig {
    /// Major code, e.g. `CS`
    pub major: Option<String>,
    pub concentration: Option<String>,
    /// Minor whose required courses are added to the core list
    pub minor: Option<String>,
}

/// Semester calendar settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CalendarConfig {
    /// Nominal program length in years
    pub years: u16,
    pub include_summer: bool,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            years: 4,
            include_summer: false,
        }
    }
}

/// Requirement resolver settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResolverConfig {
    /// Most elective candidates considered per category
    pub elective_option_limit: usize,
    /// Departments a `STEM` filter matches
    pub stem_departments: BTreeSet<String>,
    /// Departments counting toward general-education credit
    pub pathway_departments: BTreeSet<String>,
    /// Credits per general-education placeholder
    pub placeholder_credits: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            elective_option_limit: 50,
            stem_departments: default_stem_departments(),
            pathway_departments: default_pathway_departments(),
            placeholder_credits: 3,
        }
    }
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProjectConfig {
    pub program: ProgramConfig,

    /// Per-semester limits by strategy
    pub limits: LimitDefaults,

    pub calendar: CalendarConfig,

    pub resolver: ResolverConfig,

    /// Extra or replacement career tracks, merged over the built-in ones
    pub career_tracks: BTreeMap<String, CareerTrack>,
}

impl ProjectConfig {
    /// Checks values the planner can't work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.calendar.years == 0 {
            return Err(ConfigError::Invalid("calendar.years must be at least 1".into()));
        }
        if self.resolver.placeholder_credits == 0 {
            return Err(ConfigError::Invalid(
                "resolver.placeholder_credits must be at least 1".into(),
            ));
        }
        if self.limits.max_credits == 0 || self.limits.ease_max_credits == 0 {
            return Err(ConfigError::Invalid("limits.max_credits must be at least 1".into()));
        }
        Ok(())
    }

    /// Planner settings described by this configuration
    pub fn planner_settings(&self) -> PlannerSettings {
        let mut career_tracks = default_career_tracks();
        career_tracks.extend(self.career_tracks.clone());

        PlannerSettings {
            limits: self.limits,
            calendar: Calendar::new(self.calendar.years, self.calendar.include_summer),
            elective_option_limit: self.resolver.elective_option_limit,
            stem_departments: self.resolver.stem_departments.clone(),
            pathway_departments: self.resolver.pathway_departments.clone(),
            placeholder_credits: self.resolver.placeholder_credits,
            career_tracks,
        }
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Strategy used when a request doesn't name one
    pub default_strategy: Strategy,

    /// Career track used when a request doesn't name one
    pub career_track: Option<String>,
}

/// Project configuration plus the user's global defaults
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    root: PathBuf,
}

impl Config {
    /// Reads both configuration files for the project at `root`
    ///
    /// Missing files fall back to defaults; the project file is validated.
    pub fn for_project(root: &Path) -> Result<Self> {
        let global = match Self::global_config_path() {
            Some(path) => read_toml::<GlobalConfig>(&path, "global")?,
            None => GlobalConfig::default(),
        };

        let path = project_config_path(root);
        let project = read_toml::<ProjectConfig>(&path, "project")?;
        project
            .validate()
            .with_context(|| format!("Invalid project config: {}", path.display()))?;

        Ok(Self {
            project,
            global,
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the global `config.toml`
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "degree-planner", "degree-planner")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    fn global_config_path() -> Option<PathBuf> {
        Self::global_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Finds the project root from the working directory
    pub fn find_project_root() -> Option<PathBuf> {
        let cwd = std::env::current_dir().ok()?;
        Self::find_project_root_from(&cwd)
    }

    /// Nearest ancestor of `start` (inclusive) holding a `.planner/` directory
    pub fn find_project_root_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|dir| dir.join(".planner").is_dir())
            .map(Path::to_path_buf)
    }

    pub fn planner_settings(&self) -> PlannerSettings {
        self.project.planner_settings()
    }

    /// A request seeded with the user's default strategy and career track
    pub fn request(&self) -> PlanRequest {
        let mut request = PlanRequest::new().strategy(self.global.default_strategy);
        if let Some(track) = &self.global.career_track {
            request = request.career_track(track.clone());
        }
        request
    }

    pub fn save_project(&self) -> Result<()> {
        write_toml(&project_config_path(&self.root), &self.project, "project")
    }

    pub fn save_global(&self) -> Result<()> {
        let path = Self::global_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        write_toml(&path, &self.global, "global")
    }
}

fn project_config_path(root: &Path) -> PathBuf {
    root.join(".planner").join("config.toml")
}

fn read_toml<T: DeserializeOwned + Default>(path: &Path, which: &str) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} config: {}", which, path.display()))?;
    toml::from_str(&content)
        .map_err(|e| ConfigError::Parse(e.to_string()))
        .with_context(|| format!("Failed to parse {} config: {}", which, path.display()))
}

fn write_toml<T: Serialize>(path: &Path, value: &T, which: &str) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
    }

    let content = toml::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {} config", which))?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write {} config: {}", which, path.display()))
}
