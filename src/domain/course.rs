//! Course catalog model
//!
//! The catalog is read-only input to a planning call. Entries are kept in
//! the order they were inserted, which is the order option scoring falls
//! back to when scores tie.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use super::code::CourseCode;
use super::prereq::Prereq;

pub const DEFAULT_CREDITS: u32 = 3;
pub const DEFAULT_DIFFICULTY: u8 = 3;
pub const DEFAULT_WORKLOAD: u8 = 3;

/// Academic term
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Term {
    Fall,
    Spring,
    Summer,
}

impl Term {
    pub fn as_str(&self) -> &'static str {
        match self {
            Term::Fall => "Fall",
            Term::Spring => "Spring",
            Term::Summer => "Summer",
        }
    }

    /// Term a calendar date falls in: January-April spring, May-July
    /// summer, August-December fall
    pub fn containing(date: NaiveDate) -> Term {
        match date.month() {
            1..=4 => Term::Spring,
            5..=7 => Term::Summer,
            _ => Term::Fall,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Term {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fall" => Ok(Term::Fall),
            "spring" => Ok(Term::Spring),
            "summer" => Ok(Term::Summer),
            other => Err(format!("Unknown term: '{}'", other)),
        }
    }
}

impl TryFrom<String> for Term {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Term> for String {
    fn from(term: Term) -> Self {
        term.as_str().to_string()
    }
}

/// A course catalog entry
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub code: CourseCode,
    pub name: String,
    pub credits: u32,
    /// 1 (easy) to 5 (hard)
    pub difficulty: u8,
    /// 1 to 5
    pub workload: u8,
    pub category: String,
    pub prereq: Option<Prereq>,
    pub coreqs: Vec<CourseCode>,
    pub tags: Vec<String>,
    /// Terms the course is historically offered in; empty means any term
    pub offered: BTreeSet<Term>,
    pub description: String,
}

impl Course {
    /// Creates a course with default credits, difficulty and workload
    pub fn new(code: CourseCode) -> Self {
        Self {
            code,
            name: String::new(),
            credits: DEFAULT_CREDITS,
            difficulty: DEFAULT_DIFFICULTY,
            workload: DEFAULT_WORKLOAD,
            category: String::new(),
            prereq: None,
            coreqs: vec![],
            tags: vec![],
            offered: BTreeSet::new(),
            description: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_credits(mut self, credits: u32) -> Self {
        self.credits = credits;
        self
    }

    /// Sets difficulty, clamped to 1..=5
    pub fn with_difficulty(mut self, difficulty: u8) -> Self {
        self.difficulty = difficulty.clamp(1, 5);
        self
    }

    pub fn with_prereq(mut self, prereq: Prereq) -> Self {
        self.prereq = Some(prereq);
        self
    }

    pub fn offered_in(mut self, terms: impl IntoIterator<Item = Term>) -> Self {
        self.offered = terms.into_iter().collect();
        self
    }

    /// Returns true if the course runs in `term` (or has no restriction)
    pub fn is_offered_in(&self, term: Term) -> bool {
        self.offered.is_empty() || self.offered.contains(&term)
    }
}

/// The course catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    courses: Vec<Course>,
    index: HashMap<CourseCode, usize>,
    /// Per-course offering overrides, winning over `Course::offered`
    offerings: HashMap<CourseCode, BTreeSet<Term>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog; a later entry with the same code replaces the
    /// earlier one in place
    pub fn from_courses(courses: impl IntoIterator<Item = Course>) -> Self {
        let mut catalog = Self::new();
        for course in courses {
            catalog.insert(course);
        }
        catalog
    }

    pub fn insert(&mut self, course: Course) {
        match self.index.get(&course.code) {
            Some(&idx) => self.courses[idx] = course,
            None => {
                self.index.insert(course.code.clone(), self.courses.len());
                self.courses.push(course);
            }
        }
    }

    /// Overrides the terms a course is offered in
    pub fn set_offering(&mut self, code: CourseCode, terms: BTreeSet<Term>) {
        self.offerings.insert(code, terms);
    }

    pub fn get(&self, code: &CourseCode) -> Option<&Course> {
        self.index.get(code).map(|&idx| &self.courses[idx])
    }

    pub fn contains(&self, code: &CourseCode) -> bool {
        self.index.contains_key(code)
    }

    /// Iterates courses in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Course> {
        self.courses.iter()
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Credit weight of a course, defaulting when unknown
    pub fn credits(&self, code: &CourseCode) -> u32 {
        self.get(code).map_or(DEFAULT_CREDITS, |c| c.credits)
    }

    /// Prerequisite expression of a course, if any
    pub fn prereq(&self, code: &CourseCode) -> Option<&Prereq> {
        self.get(code).and_then(|c| c.prereq.as_ref())
    }

    /// Returns true if the course can be taken in `term`
    ///
    /// Unknown courses are unrestricted here; callers decide separately
    /// whether an unknown course is schedulable at all.
    pub fn is_offered_in(&self, code: &CourseCode, term: Term) -> bool {
        if let Some(terms) = self.offerings.get(code) {
            return terms.is_empty() || terms.contains(&term);
        }
        self.get(code).map_or(true, |c| c.is_offered_in(term))
    }
}
