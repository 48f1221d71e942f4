//! Degree program files
//!
//! One file holds every program and minor, in JSON or YAML (chosen by
//! extension):
//!
//! ```yaml
//! programs:
//!   CS:
//!     major_name: Computer Science
//!     core_courses: [CS 1114, CS 2114]
//!     concentrations:
//!       CS-AI:
//!         additional_core: [CS 4804]
//! minors:
//!   MATH:
//!     minor_name: Mathematics
//!     required_courses: [MATH 2114]
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::{DegreeRequirements, MinorRequirements};

#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("Program not found: {0}")]
    ProgramNotFound(String),

    #[error("Minor not found: {0}")]
    MinorNotFound(String),

    #[error("Failed to parse program file: {0}")]
    Parse(String),
}

/// Summary line for listing programs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramSummary {
    pub code: String,
    pub name: String,
    pub college: String,
    pub degree: String,
    pub has_concentrations: bool,
    pub has_sequence: bool,
}

/// Summary line for listing minors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinorSummary {
    pub code: String,
    pub name: String,
    pub total_credits: u32,
}

/// All programs and minors of one file, keyed by uppercase code
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProgramIndex {
    programs: BTreeMap<String, DegreeRequirements>,
    minors: BTreeMap<String, MinorRequirements>,
}

impl ProgramIndex {
    pub fn from_json(content: &str) -> Result<Self, ProgramError> {
        serde_json::from_str::<Self>(content)
            .map(Self::normalized)
            .map_err(|e| ProgramError::Parse(e.to_string()))
    }

    pub fn from_yaml(content: &str) -> Result<Self, ProgramError> {
        serde_yaml::from_str::<Self>(content)
            .map(Self::normalized)
            .map_err(|e| ProgramError::Parse(e.to_string()))
    }

    fn normalized(self) -> Self {
        Self {
            programs: self
                .programs
                .into_iter()
                .map(|(k, v)| (k.to_uppercase(), v))
                .collect(),
            minors: self
                .minors
                .into_iter()
                .map(|(k, v)| (k.to_uppercase(), v))
                .collect(),
        }
    }

    /// Requirements of a major, with a concentration merged in if given
    ///
    /// An unknown concentration leaves the major's requirements as they are.
    pub fn requirements(
        &self,
        major: &str,
        concentration: Option<&str>,
    ) -> Result<DegreeRequirements, ProgramError> {
        let program = self
            .programs
            .get(&major.to_uppercase())
            .cloned()
            .ok_or_else(|| ProgramError::ProgramNotFound(major.to_string()))?;

        Ok(match concentration {
            Some(name) => program.with_concentration(name),
            None => program,
        })
    }

    pub fn minor(&self, code: &str) -> Result<&MinorRequirements, ProgramError> {
        self.minors
            .get(&code.to_uppercase())
            .ok_or_else(|| ProgramError::MinorNotFound(code.to_string()))
    }

    /// Programs sorted by code
    pub fn list_programs(&self) -> Vec<ProgramSummary> {
        self.programs
            .iter()
            .map(|(code, p)| ProgramSummary {
                code: code.clone(),
                name: p.major_name.clone(),
                college: p.college.clone(),
                degree: if p.degree.is_empty() {
                    "BS".to_string()
                } else {
                    p.degree.clone()
                },
                has_concentrations: !p.concentrations.is_empty(),
                has_sequence: !p.recommended_sequence.is_empty(),
            })
            .collect()
    }

    /// Minors sorted by code
    pub fn list_minors(&self) -> Vec<MinorSummary> {
        self.minors
            .iter()
            .map(|(code, m)| MinorSummary {
                code: code.clone(),
                name: m.minor_name.clone(),
                total_credits: m.total_credits,
            })
            .collect()
    }
}

/// Loads the programs file
pub struct ProgramStore {
    path: PathBuf,
}

impl ProgramStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the default store for a project
    ///
    /// Prefers `programs.yaml`, then `programs.yml`, then `programs.json`.
    pub fn for_project(project_root: &Path) -> Self {
        let dir = project_root.join(".planner");
        let path = ["programs.yaml", "programs.yml", "programs.json"]
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.exists())
            .unwrap_or_else(|| dir.join("programs.json"));
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the index; a missing file is an empty index
    pub fn load(&self) -> Result<ProgramIndex> {
        if !self.path.exists() {
            return Ok(ProgramIndex::default());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read program file: {}", self.path.display()))?;

        let is_yaml = matches!(
            self.path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let index = if is_yaml {
            ProgramIndex::from_yaml(&content)
        } else {
            ProgramIndex::from_json(&content)
        }
        .with_context(|| format!("Failed to load programs: {}", self.path.display()))?;

        debug!(
            programs = index.programs.len(),
            minors = index.minors.len(),
            "loaded program index"
        );
        Ok(index)
    }
}
