//! Semester packer
//!
//! Walks the ordering once and drops each item into the earliest semester
//! where it is offered, its prerequisites are met by done courses or
//! courses in strictly earlier semesters, and the semester's credit,
//! difficulty and (in balanced mode) hard-course limits still hold.

use tracing::debug;

use super::facts::{CourseFacts, MAX_HARD_PER_SEMESTER};
use super::scheduler::OrderedEntry;
use super::settings::Limits;
use crate::domain::{CodeSet, PlanItem, Schedule, SemesterId, SemesterSlot};

/// Packs the ordering into the active semesters
///
/// Returns the schedule and the items no semester could take, in ordering
/// order. Courses missing from the catalog are never placed.
pub fn pack(
    ordered: &[OrderedEntry],
    done: &CodeSet,
    semesters: &[SemesterId],
    limits: &Limits,
    facts: &CourseFacts<'_>,
) -> (Schedule, Vec<PlanItem>) {
    let mut schedule = Schedule::new(semesters);
    let mut unplaced: Vec<PlanItem> = Vec::new();

    for entry in ordered {
        let item = &entry.item;
        if schedule.contains(item) || unplaced.contains(item) {
            continue;
        }

        match first_fit(&schedule, item, done, limits, facts) {
            Some(index) => {
                schedule.place(index, item.clone());
            }
            None => {
                debug!(item = %item, "no semester fits");
                unplaced.push(item.clone());
            }
        }
    }

    (schedule, unplaced)
}

/// Earliest slot that can take `item`
fn first_fit(
    schedule: &Schedule,
    item: &PlanItem,
    done: &CodeSet,
    limits: &Limits,
    facts: &CourseFacts<'_>,
) -> Option<usize> {
    let prereq = match item {
        PlanItem::Course(code) if !facts.is_known(code) => return None,
        PlanItem::Course(code) => facts.prereq(code),
        PlanItem::Placeholder(_) => None,
    };

    // Done courses plus everything placed before the slot being checked
    let mut available = done.clone();
    for slot in schedule.slots() {
        let prereqs_met = prereq.map_or(true, |p| p.is_satisfied_by(&available));
        if prereqs_met && fits(slot, item, limits, facts) {
            return Some(slot.index);
        }
        available.extend(slot.courses().cloned());
    }
    None
}

/// Term and capacity checks for adding `item` to `slot`
fn fits(
    slot: &SemesterSlot,
    item: &PlanItem,
    limits: &Limits,
    facts: &CourseFacts<'_>,
) -> bool {
    if !facts.is_offered_in(item, slot.id.term()) {
        return false;
    }

    let credits = facts.total_credits(&slot.items) + facts.credits(item);
    if credits > limits.max_credits {
        return false;
    }

    let difficulty = facts.total_difficulty(&slot.items) + u32::from(facts.difficulty(item));
    if difficulty > limits.max_difficulty {
        return false;
    }

    !(limits.balanced
        && facts.is_hard(item)
        && facts.hard_count(&slot.items) >= MAX_HARD_PER_SEMESTER)
}
