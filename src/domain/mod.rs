//! Domain models for degree planning
//!
//! Contains the core types and the prerequisite evaluator without any I/O
//! concerns.

mod code;
mod course;
mod graph;
mod prereq;
mod requirement;
mod semester;

pub use code::{normalize, CodeError, CodeSet, CourseCode};
pub use course::{Catalog, Course, Term, DEFAULT_CREDITS, DEFAULT_DIFFICULTY, DEFAULT_WORKLOAD};
pub use graph::{DependencyGraph, GraphError};
pub use prereq::{course_codes, missing, satisfied, Prereq, CREDITS_PER_COURSE};
pub use requirement::{
    ChoiceGroup, Concentration, CourseFilter, DegreeRequirements, DepartmentFilter,
    ElectiveCategory, FilterError, MinorRequirements, ScienceRequirements, ScienceSequence,
};
pub use semester::{
    semesters_remaining, Calendar, PlanItem, Schedule, SemesterError, SemesterId, SemesterSlot,
};
