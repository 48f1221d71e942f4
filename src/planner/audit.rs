//! Schedule audit
//!
//! Checks a schedule (generated or edited by hand) against the planning
//! rules and reports every problem found. Detects:
//! - Items scheduled more than once
//! - Courses missing from the catalog
//! - Courses not offered in their semester's term
//! - Prerequisites not met by done courses or earlier semesters
//! - Semesters over the credit, difficulty or hard-course limit

use serde::Serialize;

use super::facts::{CourseFacts, MAX_HARD_PER_SEMESTER};
use super::settings::Limits;
use crate::domain::{CodeSet, PlanItem, Schedule, SemesterId};

/// Categories of audit findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    DuplicateItem,
    UnknownCourse,
    NotOffered,
    PrerequisiteNotMet,
    CreditOverload,
    DifficultyOverload,
    HardCourseOverload,
}

/// One audit finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditIssue {
    pub kind: IssueKind,
    pub semester: SemesterId,
    /// Item the finding is about; `None` for semester-wide findings
    pub item: Option<String>,
    pub message: String,
}

impl AuditIssue {
    fn new(
        kind: IssueKind,
        semester: SemesterId,
        item: Option<&PlanItem>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            semester,
            item: item.map(|i| i.to_string()),
            message: message.into(),
        }
    }
}

/// Audits a schedule, returning all findings in semester order
pub fn audit(
    schedule: &Schedule,
    done: &CodeSet,
    limits: &Limits,
    facts: &CourseFacts<'_>,
) -> Vec<AuditIssue> {
    let mut issues = Vec::new();
    let mut seen: Vec<&PlanItem> = Vec::new();
    let mut available = done.clone();

    for slot in schedule.slots() {
        let id = slot.id;

        for item in &slot.items {
            if seen.contains(&item) {
                issues.push(AuditIssue::new(
                    IssueKind::DuplicateItem,
                    id,
                    Some(item),
                    format!("{} is scheduled more than once", item),
                ));
            }
            seen.push(item);

            let PlanItem::Course(code) = item else {
                continue;
            };

            if !facts.is_known(code) {
                issues.push(AuditIssue::new(
                    IssueKind::UnknownCourse,
                    id,
                    Some(item),
                    format!("{} is not in the course catalog", code),
                ));
                continue;
            }

            if !facts.is_offered_in(item, id.term()) {
                issues.push(AuditIssue::new(
                    IssueKind::NotOffered,
                    id,
                    Some(item),
                    format!("{} is not offered in {}", code, id.term().as_str()),
                ));
            }

            if let Some(prereq) = facts.prereq(code) {
                let missing = prereq.missing_from(&available);
                if !missing.is_empty() {
                    issues.push(AuditIssue::new(
                        IssueKind::PrerequisiteNotMet,
                        id,
                        Some(item),
                        format!("{} needs {} before {}", code, missing.join(", "), id),
                    ));
                }
            }
        }

        let credits = facts.total_credits(&slot.items);
        if credits > limits.max_credits {
            issues.push(AuditIssue::new(
                IssueKind::CreditOverload,
                id,
                None,
                format!("{} credits exceeds the limit of {}", credits, limits.max_credits),
            ));
        }

        let difficulty = facts.total_difficulty(&slot.items);
        if difficulty > limits.max_difficulty {
            issues.push(AuditIssue::new(
                IssueKind::DifficultyOverload,
                id,
                None,
                format!(
                    "difficulty {} exceeds the limit of {}",
                    difficulty, limits.max_difficulty
                ),
            ));
        }

        let hard = facts.hard_count(&slot.items);
        if limits.balanced && hard > MAX_HARD_PER_SEMESTER {
            issues.push(AuditIssue::new(
                IssueKind::HardCourseOverload,
                id,
                None,
                format!("{} hard courses in one semester", hard),
            ));
        }

        available.extend(slot.courses().cloned());
    }

    issues
}

/// Returns true if every scheduled course has its prerequisites met by
/// done courses or courses in strictly earlier semesters
pub fn ordering_holds(schedule: &Schedule, done: &CodeSet, facts: &CourseFacts<'_>) -> bool {
    let mut available = done.clone();
    for slot in schedule.slots() {
        let met = slot
            .courses()
            .all(|code| facts.prereq(code).map_or(true, |p| p.is_satisfied_by(&available)));
        if !met {
            return false;
        }
        available.extend(slot.courses().cloned());
    }
    true
}
