//! Catalog file loading
//!
//! The catalog is a JSON object keyed by course code, either bare or
//! wrapped as `{"courses": {...}, "metadata": {...}}`:
//!
//! ```json
//! {
//!   "CS 2114": {
//!     "name": "Software Design and Data Structures",
//!     "credits": 3,
//!     "prereqs": ["CS 1114"],
//!     "difficulty": 3,
//!     "typically_offered": ["Fall", "Spring"]
//!   }
//! }
//! ```
//!
//! An external refresher may rewrite the file between planning calls, so
//! reads take a shared lock.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::domain::{
    Catalog, Course, CourseCode, Prereq, Term, DEFAULT_CREDITS, DEFAULT_DIFFICULTY,
    DEFAULT_WORKLOAD,
};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse catalog: {0}")]
    Parse(String),
}

fn default_credits() -> u32 {
    DEFAULT_CREDITS
}

fn default_difficulty() -> u8 {
    DEFAULT_DIFFICULTY
}

fn default_workload() -> u8 {
    DEFAULT_WORKLOAD
}

/// One catalog entry as stored on disk
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_credits")]
    pub credits: u32,
    /// Flat list, all required
    #[serde(default)]
    pub prereqs: Vec<CourseCode>,
    /// Expression tree; wins over `prereqs` when present
    #[serde(default)]
    pub prereqs_structured: Option<Prereq>,
    #[serde(default)]
    pub coreqs: Vec<CourseCode>,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
    #[serde(default = "default_workload")]
    pub workload: u8,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub typically_offered: Vec<Term>,
    #[serde(default)]
    pub description: String,
}

impl CatalogEntry {
    /// Converts to a domain course
    pub fn into_course(self, code: CourseCode) -> Course {
        let prereq = match self.prereqs_structured {
            Some(tree) => Some(tree),
            None => Prereq::from_flat(self.prereqs),
        };

        let mut course = Course::new(code)
            .with_name(self.name)
            .with_credits(self.credits)
            .with_difficulty(self.difficulty)
            .offered_in(self.typically_offered);
        course.prereq = prereq;
        course.workload = self.workload.clamp(1, 5);
        course.category = self.category;
        course.coreqs = self.coreqs;
        course.tags = self.tags;
        course.description = self.description;
        course
    }
}

/// Either layout of the catalog file
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Wrapped {
        courses: BTreeMap<CourseCode, CatalogEntry>,
    },
    Flat(BTreeMap<CourseCode, CatalogEntry>),
}

impl CatalogFile {
    fn into_entries(self) -> BTreeMap<CourseCode, CatalogEntry> {
        match self {
            CatalogFile::Wrapped { courses } => courses,
            CatalogFile::Flat(courses) => courses,
        }
    }
}

/// Parses catalog JSON; courses come out sorted by code
pub fn parse_catalog(json: &str) -> Result<Catalog, CatalogError> {
    let file: CatalogFile =
        serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;

    Ok(Catalog::from_courses(
        file.into_entries()
            .into_iter()
            .map(|(code, entry)| entry.into_course(code)),
    ))
}

/// Parses an offering override map: `{"CS 3214": ["Fall"]}`
pub fn parse_offerings(json: &str) -> Result<BTreeMap<CourseCode, BTreeSet<Term>>, CatalogError> {
    serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))
}

/// Catalog file plus an optional offering override file
pub struct CatalogStore {
    path: PathBuf,
    offerings_path: Option<PathBuf>,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            offerings_path: None,
        }
    }

    /// Applies offering overrides from `path` when it exists
    pub fn with_offerings(mut self, path: impl Into<PathBuf>) -> Self {
        self.offerings_path = Some(path.into());
        self
    }

    /// Creates the default store for a project
    pub fn for_project(project_root: &Path) -> Self {
        let dir = project_root.join(".planner");
        Self::new(dir.join("catalog.json")).with_offerings(dir.join("offerings.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the catalog with overrides applied
    pub fn load(&self) -> Result<Catalog> {
        if !self.path.exists() {
            return Err(CatalogError::NotFound(self.path.clone()).into());
        }

        let content = read_locked(&self.path)?;
        let mut catalog = parse_catalog(&content)
            .with_context(|| format!("Failed to load catalog: {}", self.path.display()))?;

        if let Some(path) = self.offerings_path.as_deref().filter(|p| p.exists()) {
            let content = read_locked(path)?;
            let offerings = parse_offerings(&content)
                .with_context(|| format!("Failed to load offerings: {}", path.display()))?;
            debug!(count = offerings.len(), "applying offering overrides");
            for (code, terms) in offerings {
                catalog.set_offering(code, terms);
            }
        }

        debug!(courses = catalog.len(), path = %self.path.display(), "loaded catalog");
        Ok(catalog)
    }
}

/// Reads a whole file under a shared lock
fn read_locked(path: &Path) -> Result<String> {
    let mut file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

    FileExt::lock_shared(&file)
        .with_context(|| format!("Failed to acquire read lock on {}", path.display()))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    // Lock is released when file is dropped
    Ok(content)
}
