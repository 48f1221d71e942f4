//! Requirement resolution
//!
//! Turns a program's requirement structure and a student's history into a
//! flat list of needed items, each with a tier, a weight (higher is
//! scheduled earlier when otherwise unconstrained) and a reason.
//!
//! # Algorithm
//!
//! 1. Core and math courses not yet done are required outright.
//! 2. Choice groups short of their pick count get the best-scoring unmet
//!    options (see [`Resolver::score_option`]).
//! 3. If too few science sequences are complete, the one with the most
//!    progress (first declared on ties) contributes its missing courses;
//!    every `required` sequence contributes its missing courses.
//! 4. Elective categories short of their minimum get the best-scoring
//!    catalog courses matching their filter.
//! 5. Remaining general-education credit becomes placeholders.

use serde::Serialize;
use std::cmp::Reverse;
use tracing::{debug, warn};

use super::facts::CourseFacts;
use super::settings::{CareerTrack, PlannerSettings, Strategy};
use crate::domain::{CodeSet, CourseCode, CourseFilter, PlanItem, ScienceSequence};

/// Weights by requirement kind
pub mod weights {
    pub const CORE: u32 = 100;
    pub const MATH: u32 = 95;
    pub const CHOICE: u32 = 90;
    pub const SCIENCE: u32 = 85;
    /// Prerequisites pulled in only because something needed depends on them
    pub const TRANSITIVE: u32 = 80;
    pub const ELECTIVE: u32 = 50;
    pub const PATHWAY: u32 = 30;
}

/// How binding a need is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NeedTier {
    Required,
    Elective,
    Pathway,
}

/// One item the student still needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeedEntry {
    pub item: PlanItem,
    pub tier: NeedTier,
    pub weight: u32,
    pub reason: String,
}

impl NeedEntry {
    fn course(code: CourseCode, tier: NeedTier, weight: u32, reason: impl Into<String>) -> Self {
        Self {
            item: PlanItem::Course(code),
            tier,
            weight,
            reason: reason.into(),
        }
    }

    pub fn course_code(&self) -> Option<&CourseCode> {
        self.item.course_code()
    }
}

/// Requirement resolver for one planning call
pub struct Resolver<'a> {
    facts: CourseFacts<'a>,
    settings: &'a PlannerSettings,
}

impl<'a> Resolver<'a> {
    pub fn new(facts: CourseFacts<'a>, settings: &'a PlannerSettings) -> Self {
        Self { facts, settings }
    }

    /// Computes everything still needed
    ///
    /// `completed` and `in_progress` both count as done. An unknown career
    /// track is treated as no track.
    pub fn compute_needed(
        &self,
        completed: &CodeSet,
        in_progress: &CodeSet,
        career_track: Option<&str>,
        strategy: Strategy,
    ) -> Vec<NeedEntry> {
        let done: CodeSet = completed.union(in_progress).cloned().collect();
        let track = career_track.and_then(|name| self.settings.career_track(name));
        let req = self.facts.requirements();

        let mut needs = NeedList::default();

        for code in &req.core_courses {
            if !done.contains(code) {
                needs.push(NeedEntry::course(
                    code.clone(),
                    NeedTier::Required,
                    weights::CORE,
                    "core requirement",
                ));
            }
        }

        for code in &req.math_requirements {
            if !done.contains(code) {
                needs.push(NeedEntry::course(
                    code.clone(),
                    NeedTier::Required,
                    weights::MATH,
                    "math requirement",
                ));
            }
        }

        for (name, group) in &req.choice_requirements {
            let satisfied = group.from.iter().filter(|c| done.contains(c)).count();
            if satisfied >= group.pick {
                continue;
            }
            let candidates: Vec<CourseCode> = group
                .from
                .iter()
                .filter(|c| !done.contains(c))
                .cloned()
                .collect();
            let selected =
                self.pick_best_options(&candidates, group.pick - satisfied, track, strategy);
            for code in selected {
                // Already planned for another requirement; it fills this pick as is
                if needs.contains(&code) {
                    continue;
                }
                needs.push(NeedEntry::course(
                    code,
                    NeedTier::Required,
                    weights::CHOICE,
                    format!("choice: {}", name),
                ));
            }
        }

        self.resolve_science(&done, &mut needs);

        for (name, category) in &req.elective_requirements {
            let filter = match category.filter.parse::<CourseFilter>() {
                Ok(filter) => filter,
                Err(e) => {
                    warn!(category = %name, error = %e, "elective filter unusable, no options");
                    continue;
                }
            };

            let have = done
                .iter()
                .filter(|c| filter.matches(c, &self.settings.stem_departments))
                .count();
            if have >= category.min_courses {
                continue;
            }

            let options = self.elective_options(&filter, &done);
            let selected =
                self.pick_best_options(&options, category.min_courses - have, track, strategy);
            for code in selected {
                if needs.contains(&code) {
                    continue;
                }
                needs.push(NeedEntry::course(
                    code,
                    NeedTier::Elective,
                    weights::ELECTIVE,
                    format!("elective: {}", name),
                ));
            }
        }

        let placeholders = self.pathway_placeholders(&done);
        for i in 1..=placeholders {
            needs.push(NeedEntry {
                item: PlanItem::Placeholder(format!("Pathway {}", i)),
                tier: NeedTier::Pathway,
                weight: weights::PATHWAY,
                reason: "general education".to_string(),
            });
        }

        debug!(
            needed = needs.entries.len(),
            placeholders, "resolved degree requirements"
        );
        needs.entries
    }

    fn resolve_science(&self, done: &CodeSet, needs: &mut NeedList) {
        let science = &self.facts.requirements().science_requirements;

        if !science.sequences.is_empty() {
            let complete = science
                .sequences
                .iter()
                .filter(|seq| seq.courses.iter().all(|c| done.contains(c)))
                .count();
            if complete < science.pick_sequences {
                if let Some(seq) = best_sequence(&science.sequences, done) {
                    self.push_missing(seq, done, needs, "science sequence");
                }
            }
        }

        for seq in &science.required {
            self.push_missing(seq, done, needs, "required science");
        }
    }

    fn push_missing(&self, seq: &ScienceSequence, done: &CodeSet, needs: &mut NeedList, kind: &str) {
        let reason = if seq.name.is_empty() {
            kind.to_string()
        } else {
            format!("{}: {}", kind, seq.name)
        };
        for code in &seq.courses {
            if !done.contains(code) {
                needs.push(NeedEntry::course(
                    code.clone(),
                    NeedTier::Required,
                    weights::SCIENCE,
                    reason.clone(),
                ));
            }
        }
    }

    /// Catalog courses matching a filter that are not done, in catalog
    /// order and capped at the configured limit
    ///
    /// Courses already needed for another requirement stay in: picking one
    /// covers the elective without adding a course.
    fn elective_options(&self, filter: &CourseFilter, done: &CodeSet) -> Vec<CourseCode> {
        self.facts
            .catalog()
            .iter()
            .map(|course| &course.code)
            .filter(|code| !done.contains(code))
            .filter(|code| filter.matches(code, &self.settings.stem_departments))
            .take(self.settings.elective_option_limit)
            .cloned()
            .collect()
    }

    /// Number of placeholders covering the general-education deficit
    ///
    /// Each done course in a pathway department counts as one placeholder's
    /// worth of credit. Partial placeholders are not emitted.
    fn pathway_placeholders(&self, done: &CodeSet) -> u32 {
        let owed = self.facts.requirements().pathways_credits;
        let per_slot = self.settings.placeholder_credits.max(1);
        if owed == 0 {
            return 0;
        }

        let earned = done
            .iter()
            .filter(|c| self.settings.pathway_departments.contains(c.department()))
            .count() as u32
            * per_slot;
        owed.saturating_sub(earned) / per_slot
    }

    /// Scores a candidate course for a "pick N of M" choice
    ///
    /// +20 if the career track recommends it; -3 per difficulty point when
    /// maximizing GPA, +5 otherwise; -2 per course named in its own
    /// prerequisite expression.
    pub fn score_option(
        &self,
        code: &CourseCode,
        track: Option<&CareerTrack>,
        strategy: Strategy,
    ) -> i32 {
        let mut score = 0;

        if track.is_some_and(|t| t.recommends(code)) {
            score += 20;
        }

        if strategy.is_ease_first() {
            score -= 3 * i32::from(self.facts.course_difficulty(code));
        } else {
            score += 5;
        }

        let prereq_count = self
            .facts
            .prereq(code)
            .map_or(0, |p| p.course_codes().len());
        score -= 2 * prereq_count as i32;

        score
    }

    /// Returns the `pick` best-scoring options
    ///
    /// Ties keep the order of `options`.
    pub fn pick_best_options(
        &self,
        options: &[CourseCode],
        pick: usize,
        track: Option<&CareerTrack>,
        strategy: Strategy,
    ) -> Vec<CourseCode> {
        let mut scored: Vec<(i32, &CourseCode)> = options
            .iter()
            .map(|code| (self.score_option(code, track, strategy), code))
            .collect();
        scored.sort_by_key(|(score, _)| Reverse(*score));

        scored
            .into_iter()
            .take(pick)
            .map(|(_, code)| code.clone())
            .collect()
    }
}

/// The sequence with the most completed courses, first declared on ties
fn best_sequence<'s>(sequences: &'s [ScienceSequence], done: &CodeSet) -> Option<&'s ScienceSequence> {
    let mut best: Option<(&ScienceSequence, usize)> = None;
    for seq in sequences {
        let progress = seq.courses.iter().filter(|c| done.contains(c)).count();
        if best.map_or(true, |(_, p)| progress > p) {
            best = Some((seq, progress));
        }
    }
    best.map(|(seq, _)| seq)
}

/// Needs in emission order plus the set of course codes already present
#[derive(Default)]
struct NeedList {
    entries: Vec<NeedEntry>,
    codes: CodeSet,
}

impl NeedList {
    fn push(&mut self, entry: NeedEntry) {
        if let Some(code) = entry.course_code() {
            self.codes.insert(code.clone());
        }
        self.entries.push(entry);
    }

    fn contains(&self, code: &CourseCode) -> bool {
        self.codes.contains(code)
    }
}
