//! Course attribute lookups shared by the pipeline stages
//!
//! Combines the catalog with program-specific overrides and placeholder
//! defaults so every stage answers "how heavy is this item" the same way.

use crate::domain::{
    Catalog, CourseCode, DegreeRequirements, PlanItem, Prereq, Term, DEFAULT_DIFFICULTY,
};

/// Difficulty at or above which a course counts as hard
pub const HARD_DIFFICULTY: u8 = 4;

/// Most hard courses a balanced semester may hold
pub const MAX_HARD_PER_SEMESTER: usize = 2;

/// Difficulty charged for a placeholder slot
pub const PLACEHOLDER_DIFFICULTY: u8 = 1;

/// Read-only view over the inputs of one planning call
#[derive(Debug, Clone, Copy)]
pub struct CourseFacts<'a> {
    catalog: &'a Catalog,
    requirements: &'a DegreeRequirements,
    placeholder_credits: u32,
}

impl<'a> CourseFacts<'a> {
    pub fn new(
        catalog: &'a Catalog,
        requirements: &'a DegreeRequirements,
        placeholder_credits: u32,
    ) -> Self {
        Self {
            catalog,
            requirements,
            placeholder_credits,
        }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn requirements(&self) -> &'a DegreeRequirements {
        self.requirements
    }

    pub fn placeholder_credits(&self) -> u32 {
        self.placeholder_credits
    }

    /// Returns true if the course exists in the catalog
    pub fn is_known(&self, code: &CourseCode) -> bool {
        self.catalog.contains(code)
    }

    pub fn prereq(&self, code: &CourseCode) -> Option<&'a Prereq> {
        self.catalog.prereq(code)
    }

    pub fn course_credits(&self, code: &CourseCode) -> u32 {
        self.catalog.credits(code)
    }

    /// Difficulty of a course: program rating, then catalog, then default
    pub fn course_difficulty(&self, code: &CourseCode) -> u8 {
        if let Some(&rating) = self.requirements.difficulty_ratings.get(code) {
            return rating;
        }
        self.catalog
            .get(code)
            .map_or(DEFAULT_DIFFICULTY, |c| c.difficulty)
    }

    pub fn credits(&self, item: &PlanItem) -> u32 {
        match item {
            PlanItem::Course(code) => self.course_credits(code),
            PlanItem::Placeholder(_) => self.placeholder_credits,
        }
    }

    pub fn difficulty(&self, item: &PlanItem) -> u8 {
        match item {
            PlanItem::Course(code) => self.course_difficulty(code),
            PlanItem::Placeholder(_) => PLACEHOLDER_DIFFICULTY,
        }
    }

    pub fn is_hard(&self, item: &PlanItem) -> bool {
        self.difficulty(item) >= HARD_DIFFICULTY
    }

    /// Placeholders fit any term
    pub fn is_offered_in(&self, item: &PlanItem, term: Term) -> bool {
        match item {
            PlanItem::Course(code) => self.catalog.is_offered_in(code, term),
            PlanItem::Placeholder(_) => true,
        }
    }

    /// Sum of credits over items
    pub fn total_credits<'i>(&self, items: impl IntoIterator<Item = &'i PlanItem>) -> u32 {
        items.into_iter().map(|i| self.credits(i)).sum()
    }

    /// Sum of difficulty over items
    pub fn total_difficulty<'i>(&self, items: impl IntoIterator<Item = &'i PlanItem>) -> u32 {
        items.into_iter().map(|i| u32::from(self.difficulty(i))).sum()
    }

    /// Number of hard items
    pub fn hard_count<'i>(&self, items: impl IntoIterator<Item = &'i PlanItem>) -> usize {
        items.into_iter().filter(|i| self.is_hard(i)).count()
    }
}
