//! Plan optimizer
//!
//! Under an ease-first strategy, semesters holding more than two hard
//! courses shed the excess into a nearby semester. A move is kept only if
//! the target is below the hard-course limit, stays within the credit and
//! difficulty limits, offers the course, and every prerequisite ordering
//! in the schedule still holds afterwards. Other strategies leave the
//! schedule untouched.

use tracing::debug;

use super::audit::ordering_holds;
use super::facts::{CourseFacts, MAX_HARD_PER_SEMESTER};
use super::settings::{Limits, Strategy};
use crate::domain::{CodeSet, PlanItem, Schedule};

/// Target offsets tried for a relocation, in order
const OFFSETS: [isize; 4] = [1, -1, 2, -2];

/// Returns the optimized copy of `schedule`
pub fn optimize(
    schedule: &Schedule,
    strategy: Strategy,
    limits: &Limits,
    facts: &CourseFacts<'_>,
    done: &CodeSet,
) -> Schedule {
    let mut working = schedule.clone();
    if !strategy.is_ease_first() {
        return working;
    }

    for index in 0..working.len() {
        let hard: Vec<PlanItem> = match working.slot(index) {
            Some(slot) => slot.items.iter().filter(|i| facts.is_hard(i)).cloned().collect(),
            None => continue,
        };
        if hard.len() <= MAX_HARD_PER_SEMESTER {
            continue;
        }

        // Latest-placed hard courses are the excess
        for item in hard.iter().skip(MAX_HARD_PER_SEMESTER) {
            if let Some(target) = relocate(&mut working, index, item, limits, facts, done) {
                debug!(item = %item, from = index, to = target, "moved hard course");
            }
        }
    }

    working
}

/// Tries each offset in turn; returns the slot the item moved to
fn relocate(
    schedule: &mut Schedule,
    from: usize,
    item: &PlanItem,
    limits: &Limits,
    facts: &CourseFacts<'_>,
    done: &CodeSet,
) -> Option<usize> {
    for offset in OFFSETS {
        let Some(to) = from.checked_add_signed(offset) else {
            continue;
        };
        let Some(slot) = schedule.slot(to) else {
            continue;
        };

        let has_room = facts.hard_count(&slot.items) < MAX_HARD_PER_SEMESTER
            && facts.is_offered_in(item, slot.id.term())
            && facts.total_credits(&slot.items) + facts.credits(item) <= limits.max_credits
            && facts.total_difficulty(&slot.items) + u32::from(facts.difficulty(item))
                <= limits.max_difficulty;
        if !has_room {
            continue;
        }

        let mut candidate = schedule.clone();
        if candidate.relocate(from, to, item) && ordering_holds(&candidate, done, facts) {
            *schedule = candidate;
            return Some(to);
        }
    }
    None
}
