//! Degree Planner - automated multi-semester course plan generation
//!
//! Given a course catalog, a degree's requirement structure and a student's
//! history, builds a deterministic semester-by-semester schedule that
//! respects prerequisite ordering, term offerings and per-semester load
//! limits.
//!
//! ```no_run
//! use degree_planner::{CourseCode, PlanRequest, Planner, Project, Strategy};
//!
//! # fn main() -> anyhow::Result<()> {
//! let project = Project::open_current()?;
//! let catalog = project.catalog()?;
//! let requirements = project.requirements()?;
//! let settings = project.settings();
//!
//! let request = PlanRequest::new()
//!     .completed([CourseCode::new("CS 1114")?])
//!     .strategy(Strategy::MaximizeGpa);
//! let plan = Planner::new(&catalog, &requirements, &settings).generate_plan(&request);
//! println!("{}", serde_json::to_string_pretty(&plan)?);
//! # Ok(())
//! # }
//! ```

pub mod domain;
pub mod planner;
pub mod storage;

pub use domain::{Catalog, Course, CourseCode, DegreeRequirements, Prereq, Schedule, SemesterId, Term};
pub use planner::{PlanRequest, PlanResult, Planner, PlannerSettings, Preferences, Strategy};
pub use storage::{Config, Project};
