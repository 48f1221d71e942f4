//! Roadmap and graduation progress reports

use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::{Catalog, CodeSet, CourseCode, DegreeRequirements};

/// A course whose prerequisites are not yet met
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockedCourse {
    pub code: CourseCode,
    pub name: String,
    /// Unmet prerequisite clauses
    pub missing: Vec<String>,
}

/// Catalog courses not yet taken, split by whether they can be taken now
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Roadmap {
    pub available: Vec<CourseCode>,
    pub locked: Vec<LockedCourse>,
}

/// Splits untaken catalog courses into available and locked, sorted by code
pub fn roadmap(catalog: &Catalog, taken: &CodeSet) -> Roadmap {
    let mut map = Roadmap::default();

    for course in catalog.iter().filter(|c| !taken.contains(&c.code)) {
        let missing = course
            .prereq
            .as_ref()
            .map(|p| p.missing_from(taken))
            .unwrap_or_default();

        if missing.is_empty() {
            map.available.push(course.code.clone());
        } else {
            map.locked.push(LockedCourse {
                code: course.code.clone(),
                name: course.name.clone(),
                missing,
            });
        }
    }

    map.available.sort();
    map.locked.sort_by(|a, b| a.code.cmp(&b.code));
    map
}

/// Progress through one list of required courses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BucketProgress {
    pub completed: Vec<CourseCode>,
    pub in_progress: Vec<CourseCode>,
    pub remaining: Vec<CourseCode>,
    pub total: usize,
}

impl BucketProgress {
    fn of(required: &[CourseCode], completed: &CodeSet, in_progress: &CodeSet) -> Self {
        let mut bucket = Self {
            total: required.len(),
            ..Default::default()
        };
        for code in required {
            if completed.contains(code) {
                bucket.completed.push(code.clone());
            } else if in_progress.contains(code) {
                bucket.in_progress.push(code.clone());
            } else {
                bucket.remaining.push(code.clone());
            }
        }
        bucket
    }

    /// Completed plus in-progress
    fn done(&self) -> usize {
        self.completed.len() + self.in_progress.len()
    }
}

/// Progress through a choice group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceProgress {
    /// Enough options are completed or in progress
    pub satisfied: bool,
    pub pick: usize,
    pub options: Vec<CourseCode>,
    pub completed: Vec<CourseCode>,
}

/// How far a student is toward the degree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraduationProgress {
    pub major: String,
    /// Finished items over core + math + choice groups, rounded to 0.1
    pub progress_percent: f64,
    pub core: BucketProgress,
    pub math: BucketProgress,
    pub choices: BTreeMap<String, ChoiceProgress>,
    pub total_credits_required: u32,
}

/// Reports progress toward a degree; in-progress courses count as done
pub fn graduation_progress(
    requirements: &DegreeRequirements,
    completed: &CodeSet,
    in_progress: &CodeSet,
) -> GraduationProgress {
    let core = BucketProgress::of(&requirements.core_courses, completed, in_progress);
    let math = BucketProgress::of(&requirements.math_requirements, completed, in_progress);

    let choices: BTreeMap<String, ChoiceProgress> = requirements
        .choice_requirements
        .iter()
        .map(|(name, group)| {
            let taken = group
                .from
                .iter()
                .filter(|c| completed.contains(c) || in_progress.contains(c))
                .count();
            let progress = ChoiceProgress {
                satisfied: taken >= group.pick,
                pick: group.pick,
                options: group.from.clone(),
                completed: group
                    .from
                    .iter()
                    .filter(|c| completed.contains(c))
                    .cloned()
                    .collect(),
            };
            (name.clone(), progress)
        })
        .collect();

    let required = core.total + math.total + choices.len();
    let finished = core.done() + math.done() + choices.values().filter(|c| c.satisfied).count();
    let progress_percent = if required == 0 {
        0.0
    } else {
        (finished as f64 / required as f64 * 1000.0).round() / 10.0
    };

    GraduationProgress {
        major: requirements.major_name.clone(),
        progress_percent,
        core,
        math,
        choices,
        total_credits_required: requirements.total_credits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChoiceGroup, Course, Prereq};

    fn code(s: &str) -> CourseCode {
        s.parse().unwrap()
    }

    fn set(list: &[&str]) -> CodeSet {
        list.iter().map(|c| code(c)).collect()
    }

    #[test]
    fn roadmap_splits_available_and_locked() {
        let catalog = Catalog::from_courses([
            Course::new(code("CS 2114")).with_prereq(Prereq::course(code("CS 1114"))),
            Course::new(code("CS 1114")),
            Course::new(code("CS 3114"))
                .with_name("Data Structures")
                .with_prereq(Prereq::all(vec![
                    Prereq::course(code("CS 2114")),
                    Prereq::course(code("MATH 2534")),
                ])),
            Course::new(code("CS 1014")),
        ]);

        let map = roadmap(&catalog, &set(&["cs1114"]));
        assert_eq!(map.available, vec![code("CS 1014"), code("CS 2114")]);
        assert_eq!(map.locked.len(), 1);
        assert_eq!(map.locked[0].code, code("CS 3114"));
        assert_eq!(map.locked[0].missing, vec!["CS 2114", "MATH 2534"]);
    }

    #[test]
    fn progress_counts_buckets() {
        let mut req = DegreeRequirements {
            major_name: "Computer Science".into(),
            core_courses: vec![code("CS 1114"), code("CS 2114"), code("CS 3114")],
            math_requirements: vec![code("MATH 1225")],
            ..Default::default()
        };
        req.choice_requirements.insert(
            "capstone".into(),
            ChoiceGroup::new(vec![code("CS 4704"), code("CS 4784")], 1),
        );

        let progress = graduation_progress(&req, &set(&["CS 1114", "MATH 1225"]), &set(&["CS 2114"]));

        assert_eq!(progress.core.completed, vec![code("CS 1114")]);
        assert_eq!(progress.core.in_progress, vec![code("CS 2114")]);
        assert_eq!(progress.core.remaining, vec![code("CS 3114")]);
        assert!(progress.math.remaining.is_empty());
        assert!(!progress.choices["capstone"].satisfied);
        // 3 of 5 items
        assert_eq!(progress.progress_percent, 60.0);
    }

    #[test]
    fn empty_program_is_zero_percent() {
        let progress =
            graduation_progress(&DegreeRequirements::default(), &CodeSet::new(), &CodeSet::new());
        assert_eq!(progress.progress_percent, 0.0);
    }
}
