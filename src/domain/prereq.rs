//! Prerequisite expressions
//!
//! A prerequisite is a tree of `COURSE`, `AND`, `OR` and `CREDITS` nodes:
//!
//! ```json
//! {"type": "AND", "requirements": [
//!     {"type": "COURSE", "code": "CS 2114"},
//!     {"type": "OR", "requirements": [
//!         {"type": "COURSE", "code": "MATH 2534"},
//!         {"type": "COURSE", "code": "MATH 3034"}
//!     ]}
//! ]}
//! ```
//!
//! Evaluation is pure: every function here reads the tree and the
//! completed set and nothing else. A missing expression (`None`) means the
//! course has no prerequisite and is always satisfied.

use serde::{Deserialize, Serialize};

use super::code::{CodeSet, CourseCode};

/// Credits counted for each completed course matching a `CREDITS` node.
///
/// The tree has no access to the catalog, so a matching course contributes
/// this conventional weight instead of its real credit value. Changing this
/// changes which students satisfy credit-count prerequisites.
pub const CREDITS_PER_COURSE: u32 = 3;

/// A prerequisite expression tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Prereq {
    /// A single course must be completed
    Course { code: CourseCode },

    /// Every child must hold
    And {
        #[serde(default)]
        requirements: Vec<Prereq>,
    },

    /// At least one child must hold
    Or {
        #[serde(default)]
        requirements: Vec<Prereq>,
    },

    /// Completed courses in `department` at or above `min_level` must add up
    /// to `min_credits` (see [`CREDITS_PER_COURSE`])
    Credits {
        #[serde(default)]
        department: String,
        #[serde(default)]
        min_level: u32,
        #[serde(default)]
        min_credits: u32,
    },
}

impl Prereq {
    /// Leaf requiring one course
    pub fn course(code: CourseCode) -> Self {
        Prereq::Course { code }
    }

    pub fn all(requirements: Vec<Prereq>) -> Self {
        Prereq::And { requirements }
    }

    pub fn any(requirements: Vec<Prereq>) -> Self {
        Prereq::Or { requirements }
    }

    pub fn credits(department: impl Into<String>, min_level: u32, min_credits: u32) -> Self {
        Prereq::Credits {
            department: department.into(),
            min_level,
            min_credits,
        }
    }

    /// Converts a flat "all of these" list into a tree
    ///
    /// Empty lists have no prerequisite, a single code becomes a leaf and
    /// anything longer an `AND` of leaves.
    pub fn from_flat(codes: Vec<CourseCode>) -> Option<Self> {
        match codes.len() {
            0 => None,
            1 => codes.into_iter().next().map(Prereq::course),
            _ => Some(Prereq::all(codes.into_iter().map(Prereq::course).collect())),
        }
    }

    /// Returns true if the expression holds against `completed`
    pub fn is_satisfied_by(&self, completed: &CodeSet) -> bool {
        match self {
            Prereq::Course { code } => completed.contains(code),
            Prereq::And { requirements } => requirements.iter().all(|r| r.is_satisfied_by(completed)),
            Prereq::Or { requirements } => requirements.iter().any(|r| r.is_satisfied_by(completed)),
            Prereq::Credits {
                department,
                min_level,
                min_credits,
            } => credits_toward(completed, department, *min_level) >= *min_credits,
        }
    }

    /// Returns human-readable descriptions of the clauses that do not hold
    ///
    /// An unsatisfied `OR` is reported once as `one of: A, B` instead of
    /// listing each alternative.
    pub fn missing_from(&self, completed: &CodeSet) -> Vec<String> {
        match self {
            Prereq::Course { code } => {
                if completed.contains(code) {
                    vec![]
                } else {
                    vec![code.to_string()]
                }
            }
            Prereq::And { requirements } => requirements
                .iter()
                .flat_map(|r| r.missing_from(completed))
                .collect(),
            Prereq::Or { requirements } => {
                if requirements.iter().any(|r| r.is_satisfied_by(completed)) {
                    return vec![];
                }
                let branches: Vec<String> = requirements
                    .iter()
                    .map(|r| r.missing_from(completed).join(" and "))
                    .filter(|b| !b.is_empty())
                    .collect();
                if branches.is_empty() {
                    return vec![];
                }
                vec![format!("one of: {}", branches.join(", "))]
            }
            Prereq::Credits {
                department,
                min_level,
                min_credits,
            } => {
                if self.is_satisfied_by(completed) {
                    vec![]
                } else {
                    vec![format!("{} credits of {} {}+", min_credits, department, min_level)]
                }
            }
        }
    }

    /// Returns every course code referenced anywhere in the tree
    ///
    /// Includes codes nested under `OR` branches. Order follows the tree,
    /// duplicates removed.
    pub fn course_codes(&self) -> Vec<CourseCode> {
        let mut codes = Vec::new();
        self.collect_codes(&mut codes);
        codes
    }

    fn collect_codes(&self, out: &mut Vec<CourseCode>) {
        match self {
            Prereq::Course { code } => {
                if !out.contains(code) {
                    out.push(code.clone());
                }
            }
            Prereq::And { requirements } | Prereq::Or { requirements } => {
                for r in requirements {
                    r.collect_codes(out);
                }
            }
            Prereq::Credits { .. } => {}
        }
    }

    /// Returns the referenced codes that still stand between `completed` and
    /// this expression holding
    ///
    /// Like [`course_codes`](Self::course_codes) but prunes satisfied
    /// subtrees: an `OR` with any satisfied branch contributes nothing,
    /// otherwise all of its codes. `CREDITS` nodes name no course.
    pub fn unmet_codes(&self, completed: &CodeSet) -> Vec<CourseCode> {
        let mut codes = Vec::new();
        self.collect_unmet(completed, &mut codes);
        codes
    }

    fn collect_unmet(&self, completed: &CodeSet, out: &mut Vec<CourseCode>) {
        match self {
            Prereq::Course { code } => {
                if !completed.contains(code) && !out.contains(code) {
                    out.push(code.clone());
                }
            }
            Prereq::And { requirements } => {
                for r in requirements {
                    r.collect_unmet(completed, out);
                }
            }
            Prereq::Or { requirements } => {
                if requirements.iter().any(|r| r.is_satisfied_by(completed)) {
                    return;
                }
                for r in requirements {
                    r.collect_unmet(completed, out);
                }
            }
            Prereq::Credits { .. } => {}
        }
    }
}

/// Evaluates an optional expression; `None` is always satisfied
pub fn satisfied(expr: Option<&Prereq>, completed: &CodeSet) -> bool {
    expr.map_or(true, |e| e.is_satisfied_by(completed))
}

/// Unmet clauses of an optional expression
pub fn missing(expr: Option<&Prereq>, completed: &CodeSet) -> Vec<String> {
    expr.map(|e| e.missing_from(completed)).unwrap_or_default()
}

/// All leaf codes of an optional expression
pub fn course_codes(expr: Option<&Prereq>) -> Vec<CourseCode> {
    expr.map(Prereq::course_codes).unwrap_or_default()
}

/// Approximate credits completed in a department at or above a level
fn credits_toward(completed: &CodeSet, department: &str, min_level: u32) -> u32 {
    let department = department.trim().to_uppercase();
    let matching = completed
        .iter()
        .filter(|code| department.is_empty() || code.department() == department)
        .filter(|code| {
            if min_level == 0 {
                return true;
            }
            code.number().is_some_and(|n| n >= min_level)
        })
        .count() as u32;

    matching * CREDITS_PER_COURSE
}
