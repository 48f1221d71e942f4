//! Project management
//!
//! A planner project is a directory holding `.planner/` with the catalog,
//! the programs file and the configuration:
//!
//! ```text
//! .planner/
//! ├── catalog.json      # Course catalog
//! ├── offerings.json    # Optional offering-pattern overrides
//! ├── programs.yaml     # Programs and minors (or programs.json)
//! └── config.toml       # Project configuration
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::{CatalogStore, Config, ProgramIndex, ProgramStore};
use crate::domain::{Catalog, DegreeRequirements};
use crate::planner::PlannerSettings;

const PLANNER_DIR: &str = ".planner";

const EMPTY_CATALOG: &str = "{\"courses\": {}}\n";

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a planner project. Initialize one first.")]
    NotInProject,

    #[error("No major configured; set [program] major in .planner/config.toml")]
    NoMajor,
}

const DEFAULT_CONFIG: &str = r#"# Degree planner configuration

[program]
# major = "CS"
# concentration = "CS-AI"
# minor = "MATH"

[calendar]
years = 4
include_summer = false
"#;

/// A directory of planning data rooted at a `.planner/` folder
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens the project rooted at `root`; fails if `.planner/` is absent
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root: PathBuf = root.into();
        if !root.join(PLANNER_DIR).is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;
        Ok(Self { root, config })
    }

    /// Opens the nearest project at or above the working directory
    pub fn open_current() -> Result<Self> {
        Config::find_project_root()
            .ok_or_else(|| anyhow::Error::from(ProjectError::NotInProject))
            .and_then(|root| Self::open(root))
    }

    /// Creates `.planner/` with a commented config and an empty catalog
    ///
    /// Files that already exist are kept as they are.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root: PathBuf = root.into();
        let dir = root.join(PLANNER_DIR);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        write_if_missing(&dir.join("config.toml"), DEFAULT_CONFIG)?;
        write_if_missing(&dir.join("catalog.json"), EMPTY_CATALOG)?;

        Self::open(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn planner_dir(&self) -> PathBuf {
        self.root.join(PLANNER_DIR)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable access for callers that edit and then save the config
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn catalog_store(&self) -> CatalogStore {
        CatalogStore::for_project(&self.root)
    }

    pub fn program_store(&self) -> ProgramStore {
        ProgramStore::for_project(&self.root)
    }

    /// Loads the catalog with offering overrides applied
    pub fn catalog(&self) -> Result<Catalog> {
        self.catalog_store().load()
    }

    pub fn programs(&self) -> Result<ProgramIndex> {
        self.program_store().load()
    }

    /// Requirements of the configured major, concentration and minor
    pub fn requirements(&self) -> Result<DegreeRequirements> {
        let program = &self.config.project.program;
        let major = program.major.as_deref().ok_or(ProjectError::NoMajor)?;

        let index = self.programs()?;
        let mut requirements = index.requirements(major, program.concentration.as_deref())?;
        if let Some(minor) = program.minor.as_deref() {
            requirements = requirements.with_minor(index.minor(minor)?);
        }
        Ok(requirements)
    }

    /// Planner settings from the project configuration
    pub fn settings(&self) -> PlannerSettings {
        self.config.planner_settings()
    }
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CourseCode;
    use tempfile::TempDir;

    fn code(s: &str) -> CourseCode {
        s.parse().unwrap()
    }

    #[test]
    fn init_writes_config_and_empty_catalog() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        assert!(project.planner_dir().join("config.toml").is_file());
        assert!(project.catalog().unwrap().is_empty());
        assert_eq!(project.root(), dir.path());
    }

    #[test]
    fn init_keeps_existing_files() {
        let dir = TempDir::new().unwrap();
        Project::init(dir.path()).unwrap();
        let config_path = dir.path().join(".planner").join("config.toml");
        fs::write(&config_path, "[calendar]\nyears = 5\n").unwrap();

        let project = Project::init(dir.path()).unwrap();
        assert_eq!(project.config().project.calendar.years, 5);
    }

    #[test]
    fn open_requires_planner_dir() {
        let dir = TempDir::new().unwrap();
        let err = Project::open(dir.path()).err().unwrap();
        assert!(matches!(err.downcast_ref::<ProjectError>(), Some(ProjectError::NotInProject)));
    }

    #[test]
    fn requirements_need_a_major() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        let err = project.requirements().unwrap_err();
        assert!(matches!(err.downcast_ref::<ProjectError>(), Some(ProjectError::NoMajor)));
    }

    #[test]
    fn requirements_merge_concentration_and_minor() {
        let dir = TempDir::new().unwrap();
        let planner_dir = dir.path().join(".planner");
        fs::create_dir_all(&planner_dir).unwrap();
        fs::write(
            planner_dir.join("config.toml"),
            "[program]\nmajor = \"cs\"\nconcentration = \"CS-AI\"\nminor = \"MATH\"\n",
        )
        .unwrap();
        fs::write(
            planner_dir.join("programs.json"),
            r#"{
                "programs": {"CS": {
                    "core_courses": ["CS 1114"],
                    "concentrations": {"CS-AI": {"additional_core": ["CS 4804"]}}
                }},
                "minors": {"MATH": {"required_courses": ["MATH 2114"]}}
            }"#,
        )
        .unwrap();

        let project = Project::open(dir.path()).unwrap();
        let requirements = project.requirements().unwrap();
        assert_eq!(
            requirements.core_courses,
            vec![code("CS 1114"), code("CS 4804"), code("MATH 2114")]
        );
        assert_eq!(project.settings().calendar.semesters().len(), 8);
    }
}
