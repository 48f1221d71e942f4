//! The planning pipeline
//!
//! Resolver → Builder → Scheduler → Packer → Optimizer. Every stage is a
//! pure function of its inputs; [`Planner::generate_plan`] wires them up.

pub mod audit;
pub mod builder;
mod facts;
pub mod needs;
pub mod optimizer;
pub mod packer;
mod plan;
pub mod progress;
pub mod scheduler;
mod settings;

pub use audit::{audit, ordering_holds, AuditIssue, IssueKind};
pub use facts::{CourseFacts, HARD_DIFFICULTY, MAX_HARD_PER_SEMESTER, PLACEHOLDER_DIFFICULTY};
pub use needs::{weights, NeedEntry, NeedTier, Resolver};
pub use plan::{PlanMetadata, PlanRequest, PlanResult, Planner};
pub use progress::{graduation_progress, roadmap, BucketProgress, ChoiceProgress, GraduationProgress, LockedCourse, Roadmap};
pub use scheduler::{OrderedEntry, Ordering};
pub use settings::{
    default_career_tracks, default_pathway_departments, default_stem_departments, CareerTrack,
    LimitDefaults, Limits, PlannerSettings, Preferences, Strategy,
};
