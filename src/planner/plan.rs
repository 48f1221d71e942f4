//! Plan generation entry point
//!
//! Runs resolver, builder, scheduler, packer and optimizer in sequence and
//! summarizes the outcome. Generation never fails: anything that can't be
//! scheduled ends up in `unplaced` with a warning.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::builder;
use super::facts::CourseFacts;
use super::needs::Resolver;
use super::optimizer;
use super::packer;
use super::scheduler;
use super::settings::{PlannerSettings, Preferences, Strategy};
use crate::domain::{Catalog, CodeSet, CourseCode, DegreeRequirements, PlanItem, Schedule};

/// Unplaced items listed individually in the warnings
const MAX_UNPLACED_SAMPLES: usize = 5;

fn default_start() -> String {
    "fall1".to_string()
}

fn default_semesters() -> usize {
    8
}

/// Inputs of one planning call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    #[serde(default)]
    pub completed: Vec<CourseCode>,
    #[serde(default)]
    pub in_progress: Vec<CourseCode>,
    /// Label of the first semester to fill, e.g. `spring2`
    #[serde(default = "default_start")]
    pub start_semester: String,
    #[serde(default = "default_semesters")]
    pub remaining_semesters: usize,
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default)]
    pub career_track: Option<String>,
    #[serde(default)]
    pub preferences: Preferences,
}

impl Default for PlanRequest {
    fn default() -> Self {
        Self {
            completed: vec![],
            in_progress: vec![],
            start_semester: default_start(),
            remaining_semesters: default_semesters(),
            strategy: Strategy::default(),
            career_track: None,
            preferences: Preferences::default(),
        }
    }
}

impl PlanRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn completed(mut self, codes: impl IntoIterator<Item = CourseCode>) -> Self {
        self.completed = codes.into_iter().collect();
        self
    }

    pub fn in_progress(mut self, codes: impl IntoIterator<Item = CourseCode>) -> Self {
        self.in_progress = codes.into_iter().collect();
        self
    }

    pub fn starting_at(mut self, label: impl Into<String>) -> Self {
        self.start_semester = label.into();
        self
    }

    pub fn semesters(mut self, count: usize) -> Self {
        self.remaining_semesters = count;
        self
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn career_track(mut self, track: impl Into<String>) -> Self {
        self.career_track = Some(track.into());
        self
    }

    pub fn preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }
}

/// Summary numbers of a generated plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanMetadata {
    pub total_credits_planned: u32,
    pub existing_credits: u32,
    /// Planned plus existing
    pub total_credits: u32,
    pub credits_required: u32,
    pub courses_placed: usize,
    pub courses_unplaced: usize,
    pub semesters_used: usize,
    pub strategy: Strategy,
    pub career_track: Option<String>,
}

/// A generated plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanResult {
    pub schedule: Schedule,
    pub metadata: PlanMetadata,
    pub warnings: Vec<String>,
    pub unplaced: Vec<String>,
}

/// Plan generator over one catalog and one program
#[derive(Debug, Clone, Copy)]
pub struct Planner<'a> {
    catalog: &'a Catalog,
    requirements: &'a DegreeRequirements,
    settings: &'a PlannerSettings,
}

impl<'a> Planner<'a> {
    pub fn new(
        catalog: &'a Catalog,
        requirements: &'a DegreeRequirements,
        settings: &'a PlannerSettings,
    ) -> Self {
        Self {
            catalog,
            requirements,
            settings,
        }
    }

    fn facts(&self) -> CourseFacts<'a> {
        CourseFacts::new(self.catalog, self.requirements, self.settings.placeholder_credits)
    }

    /// Generates a plan for the request
    pub fn generate_plan(&self, request: &PlanRequest) -> PlanResult {
        let facts = self.facts();
        let completed: CodeSet = request.completed.iter().cloned().collect();
        let in_progress: CodeSet = request.in_progress.iter().cloned().collect();
        let done: CodeSet = completed.union(&in_progress).cloned().collect();

        let semesters = self
            .settings
            .calendar
            .active(&request.start_semester, request.remaining_semesters);
        let limits = self
            .settings
            .limits
            .resolve(request.strategy, &request.preferences);

        let needed = Resolver::new(facts, self.settings).compute_needed(
            &completed,
            &in_progress,
            request.career_track.as_deref(),
            request.strategy,
        );

        let (graph, all_codes) = builder::build(&needed, &done, &facts);
        debug!(
            nodes = graph.len(),
            edges = graph.edge_count(),
            "built dependency graph"
        );

        let cycles = graph.cycles();
        for cycle in &cycles {
            let codes: Vec<String> = cycle.iter().map(|c| c.to_string()).collect();
            warn!(courses = %codes.join(", "), "prerequisite cycle in catalog data");
        }

        let ordering = scheduler::order(&graph, &all_codes, &needed);
        let (schedule, mut unplaced) =
            packer::pack(&ordering.entries, &done, &semesters, &limits, &facts);
        unplaced.extend(ordering.stuck.iter().cloned().map(PlanItem::Course));

        let schedule = optimizer::optimize(&schedule, request.strategy, &limits, &facts, &done);

        let total_credits_planned = facts.total_credits(schedule.items());
        let existing_credits: u32 = done.iter().map(|c| facts.course_credits(c)).sum();
        let total_credits = total_credits_planned + existing_credits;
        let credits_required = self.requirements.total_credits;

        let mut warnings = Vec::new();
        if !unplaced.is_empty() {
            warnings.push(format!("{} courses could not be scheduled", unplaced.len()));
            for item in unplaced.iter().take(MAX_UNPLACED_SAMPLES) {
                warnings.push(format!("  - {}: {}", item, unplaced_hint(item, &facts, &ordering.stuck)));
            }
        }
        for cycle in &cycles {
            let codes: Vec<String> = cycle.iter().map(|c| c.to_string()).collect();
            warnings.push(format!("Prerequisite cycle detected among: {}", codes.join(", ")));
        }
        if total_credits < credits_required {
            warnings.push(format!(
                "Plan has {} fewer credits than required ({})",
                credits_required - total_credits,
                credits_required
            ));
        }

        let metadata = PlanMetadata {
            total_credits_planned,
            existing_credits,
            total_credits,
            credits_required,
            courses_placed: schedule.items().count(),
            courses_unplaced: unplaced.len(),
            semesters_used: schedule.semesters_used(),
            strategy: request.strategy,
            career_track: request.career_track.clone(),
        };

        info!(
            placed = metadata.courses_placed,
            unplaced = metadata.courses_unplaced,
            semesters = metadata.semesters_used,
            strategy = request.strategy.as_str(),
            "generated plan"
        );

        PlanResult {
            schedule,
            metadata,
            warnings,
            unplaced: unplaced.iter().map(|i| i.to_string()).collect(),
        }
    }
}

fn unplaced_hint(item: &PlanItem, facts: &CourseFacts<'_>, stuck: &[CourseCode]) -> &'static str {
    match item {
        PlanItem::Course(code) if stuck.contains(code) => "blocked by a prerequisite cycle",
        PlanItem::Course(code) if !facts.is_known(code) => "not found in the course catalog",
        _ => "check prerequisites or offering patterns",
    }
}
