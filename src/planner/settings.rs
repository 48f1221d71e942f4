//! Planner settings, strategies and per-request preferences

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{Calendar, CourseCode};

/// Planning strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Finish as fast as possible, front-loading prerequisite chains
    #[default]
    OnTime,
    /// Easiest path: prefer easy options, lighter loads, spread hard courses
    MaximizeGpa,
    /// Favor electives recommended for the student's career track
    CareerOptimized,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::OnTime => "on_time",
            Strategy::MaximizeGpa => "maximize_gpa",
            Strategy::CareerOptimized => "career_optimized",
        }
    }

    /// Returns true if the strategy optimizes for ease
    pub fn is_ease_first(&self) -> bool {
        matches!(self, Strategy::MaximizeGpa)
    }
}

/// Optional per-request overrides of the strategy's limits
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub max_credits: Option<u32>,
    pub max_difficulty_score: Option<u32>,
    pub balanced: Option<bool>,
}

/// Per-semester limits in force for one planning call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Limits {
    pub max_credits: u32,
    pub max_difficulty: u32,
    /// At most two hard courses per semester
    pub balanced: bool,
}

/// Default limits per strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitDefaults {
    pub max_credits: u32,
    pub max_difficulty: u32,
    /// Credit ceiling when maximizing GPA
    pub ease_max_credits: u32,
    /// Difficulty ceiling when maximizing GPA
    pub ease_max_difficulty: u32,
}

impl Default for LimitDefaults {
    fn default() -> Self {
        Self {
            max_credits: 18,
            max_difficulty: 16,
            ease_max_credits: 16,
            ease_max_difficulty: 12,
        }
    }
}

impl LimitDefaults {
    /// Resolves the limits for a strategy, applying preferences on top
    pub fn resolve(&self, strategy: Strategy, preferences: &Preferences) -> Limits {
        let ease = strategy.is_ease_first();
        let (credits, difficulty) = if ease {
            (self.ease_max_credits, self.ease_max_difficulty)
        } else {
            (self.max_credits, self.max_difficulty)
        };

        Limits {
            max_credits: preferences.max_credits.unwrap_or(credits),
            max_difficulty: preferences.max_difficulty_score.unwrap_or(difficulty),
            balanced: preferences.balanced.unwrap_or(ease),
        }
    }
}

/// Courses recommended for a career track
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CareerTrack {
    pub recommended: Vec<CourseCode>,
}

impl CareerTrack {
    pub fn recommends(&self, code: &CourseCode) -> bool {
        self.recommended.contains(code)
    }
}

/// Everything the pipeline needs besides the catalog and requirements
#[derive(Debug, Clone)]
pub struct PlannerSettings {
    pub limits: LimitDefaults,
    pub calendar: Calendar,
    /// Most elective candidates considered per category
    pub elective_option_limit: usize,
    /// Departments a `STEM` filter matches
    pub stem_departments: BTreeSet<String>,
    /// Departments whose courses count toward general-education credit
    pub pathway_departments: BTreeSet<String>,
    /// Credits one general-education placeholder stands for
    pub placeholder_credits: u32,
    pub career_tracks: BTreeMap<String, CareerTrack>,
}

impl PlannerSettings {
    pub fn career_track(&self, name: &str) -> Option<&CareerTrack> {
        self.career_tracks.get(name)
    }
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            limits: LimitDefaults::default(),
            calendar: Calendar::default(),
            elective_option_limit: 50,
            stem_departments: default_stem_departments(),
            pathway_departments: default_pathway_departments(),
            placeholder_credits: 3,
            career_tracks: default_career_tracks(),
        }
    }
}

fn strings(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn default_stem_departments() -> BTreeSet<String> {
    strings(&[
        "AOE", "BIOL", "BMES", "BSE", "CEE", "CHE", "CHEM", "CMDA", "CS", "ECE", "ESM", "ISE",
        "MATH", "ME", "MINE", "MSE", "NSEG", "PHYS", "STAT",
    ])
}

pub fn default_pathway_departments() -> BTreeSet<String> {
    strings(&[
        "ART", "COMM", "ECON", "ENGL", "HIST", "HUM", "MUS", "PHIL", "PSCI", "PSYC", "RLCL",
        "SOC", "WGS",
    ])
}

pub fn default_career_tracks() -> BTreeMap<String, CareerTrack> {
    let tracks: [(&str, &[&str]); 6] = [
        (
            "software_engineering",
            &["CS 3704", "CS 3724", "CS 4704", "CS 4274", "CS 4784"],
        ),
        (
            "ai_ml",
            &["CS 4804", "CS 4824", "CS 4644", "STAT 4706", "MATH 4564"],
        ),
        (
            "systems",
            &["CS 4114", "CS 4254", "CS 4284", "CS 4264", "ECE 2564"],
        ),
        ("security", &["CS 4264", "CS 4284", "CS 4114", "ECE 4560"]),
        ("hci", &["CS 3724", "CS 3744", "CS 4784", "CS 4234"]),
        (
            "data_science",
            &["CS 4804", "CS 4824", "CS 4604", "STAT 4706", "CMDA 3654"],
        ),
    ];

    tracks
        .iter()
        .map(|(name, codes)| {
            let recommended = codes.iter().filter_map(|c| c.parse().ok()).collect();
            (name.to_string(), CareerTrack { recommended })
        })
        .collect()
}
