//! Dependency graph builder
//!
//! Expands the needed courses breadth-first through their prerequisite
//! trees. Only codes that still stand between the student and a needed
//! course become nodes; an `OR` already satisfied by done courses adds no
//! edges, and an unsatisfied one pulls in every branch. Prerequisite codes
//! missing from the catalog are left out.

use std::collections::{HashSet, VecDeque};

use super::facts::CourseFacts;
use super::needs::NeedEntry;
use crate::domain::{CodeSet, CourseCode, DependencyGraph};

/// Builds the graph of owed courses
///
/// Returns the graph and every node code in discovery order. Placeholders
/// are skipped; the caller carries them separately.
pub fn build(
    needed: &[NeedEntry],
    done: &CodeSet,
    facts: &CourseFacts<'_>,
) -> (DependencyGraph, Vec<CourseCode>) {
    let mut graph = DependencyGraph::new();
    let mut all_codes = Vec::new();
    let mut seen: HashSet<CourseCode> = HashSet::new();
    let mut queue: VecDeque<CourseCode> = needed
        .iter()
        .filter_map(NeedEntry::course_code)
        .cloned()
        .collect();

    while let Some(code) = queue.pop_front() {
        if done.contains(&code) || !seen.insert(code.clone()) {
            continue;
        }

        graph.add_course(code.clone());
        all_codes.push(code.clone());

        let Some(prereq) = facts.prereq(&code) else {
            continue;
        };
        // Unknown prerequisite codes never become nodes; a course that
        // truly needs one stays unplaceable on its own
        for dep in prereq
            .unmet_codes(done)
            .into_iter()
            .filter(|dep| facts.is_known(dep))
        {
            graph.add_course(dep.clone());
            // Both ends exist, so the edge insert cannot fail
            let _ = graph.add_dependency(&code, &dep);
            if !seen.contains(&dep) {
                queue.push_back(dep);
            }
        }
    }

    (graph, all_codes)
}
