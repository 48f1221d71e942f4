//! Priority scheduler
//!
//! Weighted Kahn's algorithm over the dependency graph. A node's in-degree
//! is the number of its own prerequisites not yet emitted; emitting a node
//! decrements the count of every course that requires it. Among ready
//! nodes the highest weight goes first, then the lowest code.

use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use tracing::warn;

use super::needs::{weights, NeedEntry};
use crate::domain::{CourseCode, DependencyGraph, PlanItem};

/// Reason attached to courses pulled in only as prerequisites
pub const TRANSITIVE_REASON: &str = "prerequisite";

/// One item of the total ordering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderedEntry {
    pub item: PlanItem,
    pub weight: u32,
    pub reason: String,
}

/// Result of ordering
#[derive(Debug, Clone, Default)]
pub struct Ordering {
    /// Courses in dependency order, then placeholders
    pub entries: Vec<OrderedEntry>,
    /// Courses that never became ready (they sit on or behind a cycle), sorted
    pub stuck: Vec<CourseCode>,
}

/// Orders the graph's courses, then appends the placeholder needs
pub fn order(
    graph: &DependencyGraph,
    all_codes: &[CourseCode],
    needed: &[NeedEntry],
) -> Ordering {
    let priorities = priorities(needed);
    let priority = |code: &CourseCode| -> (u32, String) {
        priorities
            .get(code)
            .map(|(w, r)| (*w, r.to_string()))
            .unwrap_or_else(|| (weights::TRANSITIVE, TRANSITIVE_REASON.to_string()))
    };

    let mut remaining: HashMap<&CourseCode, usize> = all_codes
        .iter()
        .map(|code| (code, graph.dependencies(code).len()))
        .collect();

    let mut ready: BinaryHeap<(u32, Reverse<CourseCode>)> = remaining
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(&code, _)| (priority(code).0, Reverse(code.clone())))
        .collect();

    let mut entries = Vec::with_capacity(all_codes.len() + needed.len());
    while let Some((_, Reverse(code))) = ready.pop() {
        for dependent in graph.dependents(&code) {
            if let Some(count) = remaining.get_mut(&dependent) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    ready.push((priority(&dependent).0, Reverse(dependent.clone())));
                }
            }
        }

        let (weight, reason) = priority(&code);
        remaining.remove(&code);
        entries.push(OrderedEntry {
            item: PlanItem::Course(code),
            weight,
            reason,
        });
    }

    let mut stuck: Vec<CourseCode> = remaining.into_keys().cloned().collect();
    stuck.sort();
    if !stuck.is_empty() {
        warn!(count = stuck.len(), "courses never became ready for scheduling");
    }

    entries.extend(
        needed
            .iter()
            .filter(|n| n.item.is_placeholder())
            .map(|n| OrderedEntry {
                item: n.item.clone(),
                weight: n.weight,
                reason: n.reason.clone(),
            }),
    );

    Ordering { entries, stuck }
}

/// Highest weight per needed course; the first reason wins among equals
fn priorities(needed: &[NeedEntry]) -> HashMap<&CourseCode, (u32, &str)> {
    let mut map: HashMap<&CourseCode, (u32, &str)> = HashMap::new();
    for need in needed {
        let Some(code) = need.course_code() else {
            continue;
        };
        match map.get(code) {
            Some((weight, _)) if *weight >= need.weight => {}
            _ => {
                map.insert(code, (need.weight, need.reason.as_str()));
            }
        }
    }
    map
}
